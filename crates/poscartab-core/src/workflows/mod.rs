//! # Workflows Module
//!
//! Path-level entry points for users of poscartab.
//!
//! - **Conversion Workflow** ([`convert`]) - Parse a POSCAR file into an atom table and
//!   serialize a table back into a POSCAR file that reuses a reference file's header.

pub mod convert;
