//! # Core Models Module
//!
//! Data structures representing a crystal structure as an ordered table of atoms.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom row: identifier, coordinates and species symbol
//! - [`table`] - The ordered atom table and its per-species block view
//!
//! ## Usage
//!
//! ```ignore
//! use poscartab::core::models::{atom::AtomRecord, table::AtomTable};
//! use nalgebra::Point3;
//!
//! let mut table = AtomTable::new();
//! table.push(AtomRecord::new("1", Point3::new(0.0, 0.0, 0.0), "Si"));
//! let blocks = table.species_blocks()?;
//! ```

pub mod atom;
pub mod table;
