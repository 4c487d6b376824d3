use super::file_error;
use crate::cli::InfoArgs;
use crate::config::FileConfig;
use crate::error::Result;
use poscartab::workflows::convert;

pub fn run(args: InfoArgs, config: &FileConfig) -> Result<()> {
    let input = config.input_path(args.input.as_deref());
    let (table, metadata) =
        convert::parse_with_metadata(&input).map_err(|e| file_error(&input, e))?;
    let blocks = table
        .species_blocks()
        .map_err(|e| file_error(&input, e.into()))?;

    println!("File:            {}", input.display());
    println!("Comment:         {}", metadata.header_lines[0].content.trim());
    println!(
        "Coordinates:     {} (line {})",
        metadata.coordinate_mode,
        metadata.mode_line_index + 1
    );
    println!("Atoms:           {}", table.len());
    println!("Species:");
    for block in &blocks {
        println!("  {:<4} {:>6}", block.symbol, block.count);
    }
    Ok(())
}
