use super::file_error;
use crate::cli::ToTableArgs;
use crate::config::FileConfig;
use crate::error::Result;
use poscartab::core::io::table_csv;
use poscartab::workflows::convert;
use tracing::info;

pub fn run(args: ToTableArgs, config: &FileConfig) -> Result<()> {
    let input = config.input_path(args.input.as_deref());
    info!("Loading input structure from {:?}", &input);
    let table = convert::parse(&input).map_err(|e| file_error(&input, e))?;

    match &args.output {
        Some(output) => {
            table_csv::write_table_csv_path(&table, output)?;
            println!(
                "✓ Table of {} atoms written to: {}",
                table.len(),
                output.display()
            );
        }
        None => {
            info!("Writing table of {} atoms to stdout.", table.len());
            table_csv::write_table_csv(&table, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
