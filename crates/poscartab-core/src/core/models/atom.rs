use nalgebra::Point3;

/// A single row of an [`AtomTable`](super::table::AtomTable).
///
/// Rows carry no lattice information; whether `position` is fractional or Cartesian
/// depends on the coordinate mode of the file the table was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Sequential identifier starting at 1, kept as text.
    pub atom_id: String,
    /// The coordinates of the atom, in the units of the source file's coordinate mode.
    pub position: Point3<f64>,
    /// The element or species label (e.g., "Si", "O").
    pub atom_symbol: String,
}

impl AtomRecord {
    pub fn new(atom_id: impl Into<String>, position: Point3<f64>, atom_symbol: &str) -> Self {
        Self {
            atom_id: atom_id.into(),
            position,
            atom_symbol: atom_symbol.to_string(),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }
}
