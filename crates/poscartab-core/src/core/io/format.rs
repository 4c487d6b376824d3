use crate::core::models::table::AtomTable;
use thiserror::Error;

pub const DEFAULT_PRECISION: usize = 6;
pub const DEFAULT_SEPARATOR_WIDTH: usize = 3;
pub const DEFAULT_INDENT: usize = 2;
pub const DEFAULT_MIN_COLUMN_WIDTH: usize = 3;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    #[error("Column separator width must be at least 1")]
    ZeroSeparatorWidth,
}

/// Controls how coordinate rows are rendered when writing a POSCAR file.
///
/// Each coordinate column is printed with `precision` decimal places and right-aligned to
/// the widest value in that column (never narrower than `min_column_width`). Every single
/// space of the aligned row, padding included, is then widened to `separator_width` spaces
/// and the row is indented by `indent` spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoscarWriteOptions {
    pub precision: usize,
    pub separator_width: usize,
    pub indent: usize,
    pub min_column_width: usize,
}

impl Default for PoscarWriteOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            indent: DEFAULT_INDENT,
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
        }
    }
}

#[derive(Default)]
pub struct PoscarWriteOptionsBuilder {
    precision: Option<usize>,
    separator_width: Option<usize>,
    indent: Option<usize>,
    min_column_width: Option<usize>,
}

impl PoscarWriteOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }
    pub fn separator_width(mut self, width: usize) -> Self {
        self.separator_width = Some(width);
        self
    }
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
    pub fn min_column_width(mut self, width: usize) -> Self {
        self.min_column_width = Some(width);
        self
    }

    pub fn build(self) -> Result<PoscarWriteOptions, FormatError> {
        let defaults = PoscarWriteOptions::default();
        let separator_width = self.separator_width.unwrap_or(defaults.separator_width);
        if separator_width == 0 {
            return Err(FormatError::ZeroSeparatorWidth);
        }
        Ok(PoscarWriteOptions {
            precision: self.precision.unwrap_or(defaults.precision),
            separator_width,
            indent: self.indent.unwrap_or(defaults.indent),
            min_column_width: self.min_column_width.unwrap_or(defaults.min_column_width),
        })
    }
}

/// Renders the x, y, z columns of `table` as fixed-width rows, one string per record.
pub fn render_coordinate_rows(table: &AtomTable, options: &PoscarWriteOptions) -> Vec<String> {
    let precision = options.precision;
    let cells: Vec<[String; 3]> = table
        .iter()
        .map(|r| {
            [
                format!("{:.precision$}", r.x()),
                format!("{:.precision$}", r.y()),
                format!("{:.precision$}", r.z()),
            ]
        })
        .collect();

    let mut widths = [options.min_column_width; 3];
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let separator = " ".repeat(options.separator_width);
    let indent = " ".repeat(options.indent);

    cells
        .iter()
        .map(|[x, y, z]| {
            let aligned = format!(
                "{:>wx$} {:>wy$} {:>wz$}",
                x,
                y,
                z,
                wx = widths[0],
                wy = widths[1],
                wz = widths[2]
            );
            format!("{}{}", indent, aligned.replace(' ', &separator))
        })
        .collect()
}
