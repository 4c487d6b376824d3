use crate::core::models::atom::AtomRecord;
use crate::core::models::table::AtomTable;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

const STREAM_NAME: &str = "<stream>";

#[derive(Debug, Error)]
pub enum TableIoError {
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Duplicate atom id '{id}' in '{path}'")]
    DuplicateId { path: String, id: String },
}

/// On-disk row layout: `atom_id,x,y,z,atom_symbol`.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    atom_id: String,
    x: f64,
    y: f64,
    z: f64,
    atom_symbol: String,
}

impl From<&AtomRecord> for CsvRow {
    fn from(r: &AtomRecord) -> Self {
        Self {
            atom_id: r.atom_id.clone(),
            x: r.x(),
            y: r.y(),
            z: r.z(),
            atom_symbol: r.atom_symbol.clone(),
        }
    }
}

impl From<CsvRow> for AtomRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            atom_id: row.atom_id,
            position: Point3::new(row.x, row.y, row.z),
            atom_symbol: row.atom_symbol,
        }
    }
}

fn write_rows<W: Write>(
    table: &AtomTable,
    mut writer: csv::Writer<W>,
    path: &str,
) -> Result<(), TableIoError> {
    for record in table {
        writer
            .serialize(CsvRow::from(record))
            .map_err(|e| TableIoError::Csv {
                path: path.to_string(),
                source: e,
            })?;
    }
    writer.flush().map_err(|e| TableIoError::Io {
        path: path.to_string(),
        source: e,
    })
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>, path: &str) -> Result<AtomTable, TableIoError> {
    let mut seen_ids = HashSet::new();
    let mut table = AtomTable::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(|e| TableIoError::Csv {
            path: path.to_string(),
            source: e,
        })?;
        if !seen_ids.insert(row.atom_id.clone()) {
            return Err(TableIoError::DuplicateId {
                path: path.to_string(),
                id: row.atom_id,
            });
        }
        table.push(row.into());
    }
    Ok(table)
}

/// Writes `table` as CSV with a header row, preserving row order.
pub fn write_table_csv(table: &AtomTable, writer: impl Write) -> Result<(), TableIoError> {
    write_rows(table, csv::Writer::from_writer(writer), STREAM_NAME)
}

pub fn write_table_csv_path(table: &AtomTable, path: &Path) -> Result<(), TableIoError> {
    let path_str = path.to_string_lossy();
    let writer = csv::Writer::from_path(path).map_err(|e| TableIoError::Csv {
        path: path_str.to_string(),
        source: e,
    })?;
    write_rows(table, writer, &path_str)
}

/// Reads a table written by [`write_table_csv`]. Row order is kept as-is.
pub fn read_table_csv(reader: impl Read) -> Result<AtomTable, TableIoError> {
    read_rows(csv::Reader::from_reader(reader), STREAM_NAME)
}

pub fn read_table_csv_path(path: &Path) -> Result<AtomTable, TableIoError> {
    let path_str = path.to_string_lossy();
    let reader = csv::Reader::from_path(path).map_err(|e| TableIoError::Csv {
        path: path_str.to_string(),
        source: e,
    })?;
    read_rows(reader, &path_str)
}
