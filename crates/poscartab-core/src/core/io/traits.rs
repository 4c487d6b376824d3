use crate::core::models::table::AtomTable;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats as atom tables.
///
/// Implementors handle format-specific parsing and serialization. Metadata carries the
/// parts of a file that are not represented in the table (headers, mode lines) so that
/// they can be reproduced on write.
pub trait StructureFile {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// Rendering options for the written file.
    type WriteOptions;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads an atom table from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(AtomTable, Self::Metadata), Self::Error>;

    /// Writes an atom table and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be expressed in the format or writing fails.
    fn write_to(
        table: &AtomTable,
        metadata: &Self::Metadata,
        options: &Self::WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads an atom table from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(AtomTable, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes an atom table and metadata to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        table: &AtomTable,
        metadata: &Self::Metadata,
        options: &Self::WriteOptions,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(table, metadata, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
