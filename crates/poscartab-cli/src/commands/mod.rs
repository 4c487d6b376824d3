pub mod info;
pub mod reformat;
pub mod to_poscar;
pub mod to_table;

use crate::error::CliError;
use poscartab::core::io::poscar::PoscarError;
use std::path::Path;

fn file_error(path: &Path, source: PoscarError) -> CliError {
    CliError::FileParsing {
        path: path.to_path_buf(),
        source: source.into(),
    }
}
