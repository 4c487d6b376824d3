use super::atom::AtomRecord;
use itertools::Itertools;
use nalgebra::Point3;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TableError {
    #[error(
        "Species '{symbol}' reappears at row {row} after a different species; rows must be grouped contiguously by species"
    )]
    NonContiguousSpecies { symbol: String, row: usize },
    #[error("Expected {expected} coordinates, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Row index {index} is out of bounds for a table of {len} rows")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// One species column of a POSCAR header: the symbol and how many atoms carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesBlock {
    pub symbol: String,
    pub count: usize,
}

/// An ordered table of atom records.
///
/// Row order is physically meaningful: a POSCAR header only stores per-species counts, so
/// rows of the same species must stay contiguous for the table to be written back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomTable {
    records: Vec<AtomRecord>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AtomRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: AtomRecord) {
        self.records.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[AtomRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtomRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<AtomRecord> {
        self.records
    }

    pub fn set_position(&mut self, index: usize, position: Point3<f64>) -> Result<(), TableError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(TableError::IndexOutOfBounds { index, len })?;
        record.position = position;
        Ok(())
    }

    /// Replaces every coordinate in row order, leaving ids and symbols untouched.
    pub fn replace_positions(&mut self, positions: &[Point3<f64>]) -> Result<(), TableError> {
        if positions.len() != self.records.len() {
            return Err(TableError::LengthMismatch {
                expected: self.records.len(),
                found: positions.len(),
            });
        }
        for (record, position) in self.records.iter_mut().zip(positions) {
            record.position = *position;
        }
        Ok(())
    }

    /// Unique species symbols in first-occurrence order.
    pub fn species_order(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.atom_symbol.as_str())
            .unique()
            .collect()
    }

    pub fn count_of(&self, symbol: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.atom_symbol == symbol)
            .count()
    }

    /// Groups consecutive rows by species.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NonContiguousSpecies`] if a symbol shows up again after a
    /// block of a different species.
    pub fn species_blocks(&self) -> Result<Vec<SpeciesBlock>, TableError> {
        let mut seen = HashSet::new();
        let mut blocks = Vec::new();
        let mut row = 1;

        for (count, symbol) in self
            .records
            .iter()
            .map(|r| r.atom_symbol.as_str())
            .dedup_with_count()
        {
            if !seen.insert(symbol) {
                return Err(TableError::NonContiguousSpecies {
                    symbol: symbol.to_string(),
                    row,
                });
            }
            blocks.push(SpeciesBlock {
                symbol: symbol.to_string(),
                count,
            });
            row += count;
        }
        Ok(blocks)
    }
}

impl<'a> IntoIterator for &'a AtomTable {
    type Item = &'a AtomRecord;
    type IntoIter = std::slice::Iter<'a, AtomRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
