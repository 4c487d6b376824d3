//! Provides input/output functionality for crystal-structure tables.
//!
//! This module contains the POSCAR codec behind a trait-based file interface, the
//! fixed-width coordinate formatting used when writing POSCAR files, and a CSV
//! interchange format so tables can be edited by external tools between reads and writes.

pub mod format;
pub mod poscar;
pub mod table_csv;
pub mod traits;
