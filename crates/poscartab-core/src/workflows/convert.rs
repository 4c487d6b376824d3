use crate::core::io::format::PoscarWriteOptions;
use crate::core::io::poscar::{PoscarError, PoscarFile, PoscarMetadata};
use crate::core::io::traits::StructureFile;
use crate::core::models::table::AtomTable;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

pub const DEFAULT_POSCAR_PATH: &str = "./POSCAR";
pub const DEFAULT_OUTPUT_PATH: &str = "./gen_data/POSCAR";

/// Reads the POSCAR file at `path` into an atom table.
#[instrument(skip_all, name = "parse_poscar", fields(path = %path.as_ref().display()))]
pub fn parse<P: AsRef<Path>>(path: P) -> Result<AtomTable, PoscarError> {
    parse_with_metadata(path).map(|(table, _)| table)
}

/// Like [`parse`], but also returns the header and mode line of the file.
pub fn parse_with_metadata<P: AsRef<Path>>(
    path: P,
) -> Result<(AtomTable, PoscarMetadata), PoscarError> {
    let (table, metadata) = PoscarFile::read_from_path(&path)?;
    info!(
        "Parsed {} atoms from {}.",
        table.len(),
        path.as_ref().display()
    );
    Ok((table, metadata))
}

/// Writes `table` to `destination_path` as a POSCAR file.
///
/// The first five lines and the coordinate-mode line are copied from `reference_path`;
/// the species and count lines are regenerated from the table. The destination's parent
/// directory is created if it does not exist. A failure part-way through the write leaves
/// a partial destination file behind.
#[instrument(skip_all, name = "serialize_poscar", fields(destination = %destination_path.as_ref().display()))]
pub fn serialize<R: AsRef<Path>, D: AsRef<Path>>(
    table: &AtomTable,
    reference_path: R,
    destination_path: D,
    options: &PoscarWriteOptions,
) -> Result<(), PoscarError> {
    let destination = destination_path.as_ref();
    let metadata = PoscarMetadata::from_path(&reference_path)?;
    debug!(
        "Reusing header and mode line {} from {}.",
        metadata.mode_line_index + 1,
        reference_path.as_ref().display()
    );

    // Validate before touching the filesystem so a bad table leaves no file behind.
    if table.is_empty() {
        return Err(PoscarError::MissingRecord("atom records".into()));
    }
    table.species_blocks()?;

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    PoscarFile::write_to_path(table, &metadata, options, destination)?;
    info!("Wrote {} atoms to {}.", table.len(), destination.display());
    Ok(())
}
