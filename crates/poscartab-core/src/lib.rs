//! # poscartab Core Library
//!
//! Conversion between VASP POSCAR crystal-structure files and a flat, ordered table of
//! atom records (id, coordinates, species symbol).
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers:
//!
//! - **[`core`]: The Foundation.** Contains the stateless table models (`AtomRecord`,
//!   `AtomTable`) and the I/O codecs (POSCAR, CSV) operating on them.
//!
//! - **[`workflows`]: The Public API.** Path-level entry points that tie the codecs to the
//!   filesystem: parse a POSCAR into a table, and serialize a table back into a POSCAR
//!   while reusing the header of a reference file.

pub mod core;
pub mod workflows;
