use super::file_error;
use crate::cli::ReformatArgs;
use crate::config::FileConfig;
use crate::error::Result;
use poscartab::workflows::convert;
use tracing::info;

pub fn run(args: ReformatArgs, config: &FileConfig) -> Result<()> {
    let input = config.input_path(args.input.as_deref());
    let output = config.output_path(args.output.as_deref());
    let options = config.write_options(args.precision)?;

    info!("Loading input structure from {:?}", &input);
    let table = convert::parse(&input).map_err(|e| file_error(&input, e))?;

    convert::serialize(&table, &input, &output, &options).map_err(|e| file_error(&output, e))?;

    println!(
        "✓ POSCAR with {} atoms written to: {}",
        table.len(),
        output.display()
    );
    Ok(())
}
