use super::file_error;
use crate::cli::ToPoscarArgs;
use crate::config::FileConfig;
use crate::error::Result;
use poscartab::core::io::table_csv;
use poscartab::workflows::convert;
use tracing::info;

pub fn run(args: ToPoscarArgs, config: &FileConfig) -> Result<()> {
    let reference = config.reference_path(args.reference.as_deref());
    let output = config.output_path(args.output.as_deref());
    let options = config.write_options(args.precision)?;

    info!("Loading atom table from {:?}", &args.table);
    let table = table_csv::read_table_csv_path(&args.table)?;

    info!(
        "Writing {} atoms to {:?} with header from {:?}",
        table.len(),
        &output,
        &reference
    );
    convert::serialize(&table, &reference, &output, &options)
        .map_err(|e| file_error(&output, e))?;

    println!(
        "✓ POSCAR with {} atoms written to: {}",
        table.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    const REFERENCE: &str = "\
FeAl B2
1.0
  2.9   0.0   0.0
  0.0   2.9   0.0
  0.0   0.0   2.9
  Fe   Al
   2   1
Direct
  0.000000   0.000000   0.000000
  0.500000   0.500000   0.000000
  0.500000   0.500000   0.500000
";

    #[test]
    fn edited_table_is_written_with_reference_header() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("POSCAR");
        fs::write(&reference, REFERENCE).unwrap();
        let table = dir.path().join("table.csv");
        fs::write(
            &table,
            "atom_id,x,y,z,atom_symbol\n1,0,0,0,Fe\n2,0.5,0.5,0,Fe\n3,0.25,0.25,0.25,Al\n",
        )
        .unwrap();
        let output = dir.path().join("gen_data").join("POSCAR");

        let args = ToPoscarArgs {
            table,
            reference: Some(reference),
            output: Some(output.clone()),
            precision: None,
        };
        run(args, &FileConfig::default()).unwrap();

        let expected = REFERENCE.replace(
            "  0.500000   0.500000   0.500000",
            "  0.250000   0.250000   0.250000",
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }

    #[test]
    fn interleaved_species_in_table_are_rejected() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("POSCAR");
        fs::write(&reference, REFERENCE).unwrap();
        let table = dir.path().join("table.csv");
        fs::write(
            &table,
            "atom_id,x,y,z,atom_symbol\n1,0,0,0,Fe\n2,0,0,0,Al\n3,0,0,0,Fe\n",
        )
        .unwrap();
        let output = dir.path().join("out").join("POSCAR");

        let args = ToPoscarArgs {
            table,
            reference: Some(reference),
            output: Some(output.clone()),
            precision: None,
        };
        assert!(matches!(
            run(args, &FileConfig::default()),
            Err(CliError::FileParsing { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn missing_table_is_a_table_error() {
        let dir = tempdir().unwrap();
        let args = ToPoscarArgs {
            table: dir.path().join("absent.csv"),
            reference: None,
            output: Some(dir.path().join("POSCAR")),
            precision: None,
        };
        assert!(matches!(
            run(args, &FileConfig::default()),
            Err(CliError::Table(_))
        ));
    }
}
