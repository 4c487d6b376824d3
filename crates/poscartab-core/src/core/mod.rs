//! # Core Module
//!
//! Fundamental building blocks for working with POSCAR structures as tables.
//!
//! - **Table Representation** ([`models`]) - Atom records and the ordered atom table
//! - **File I/O** ([`io`]) - POSCAR reading/writing, coordinate formatting, CSV interchange

pub mod io;
pub mod models;
