use crate::core::io::format::{PoscarWriteOptions, render_coordinate_rows};
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::table::{AtomTable, TableError};
use itertools::Itertools;
use nalgebra::Point3;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Number of leading lines (comment, scaling factor, three lattice vectors) reused verbatim.
pub const HEADER_LINE_COUNT: usize = 5;
const SPECIES_LINE_INDEX: usize = 5;
const COUNTS_LINE_INDEX: usize = 6;
const MODE_MARKERS: [&str; 2] = ["Direct", "Cartesian"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateMode {
    /// Fractional coordinates in units of the lattice vectors.
    Direct,
    /// Cartesian coordinates in the units of the lattice vectors' scale.
    Cartesian,
}

impl CoordinateMode {
    fn from_marker_line(line: &str) -> Option<Self> {
        if line.contains("Direct") {
            Some(Self::Direct)
        } else if line.contains("Cartesian") {
            Some(Self::Cartesian)
        } else {
            None
        }
    }
}

impl fmt::Display for CoordinateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "Direct"),
            Self::Cartesian => write!(f, "Cartesian"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Last line of a file without a trailing newline.
    Missing,
}

impl LineEnding {
    /// Terminator used when the line is written back out.
    pub fn terminator(self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf | Self::Missing => "\n",
        }
    }
}

/// A source line split into its text and its original terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub content: String,
    pub ending: LineEnding,
}

impl RawLine {
    fn from_buffer(mut buf: String) -> Self {
        let ending = if buf.ends_with("\r\n") {
            buf.truncate(buf.len() - 2);
            LineEnding::CrLf
        } else if buf.ends_with('\n') {
            buf.truncate(buf.len() - 1);
            LineEnding::Lf
        } else {
            LineEnding::Missing
        };
        Self {
            content: buf,
            ending,
        }
    }

    fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{}{}", self.content, self.ending.terminator())
    }
}

impl AsRef<str> for RawLine {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Reads every line of `reader`, keeping track of each line's terminator.
pub fn read_raw_lines(reader: &mut impl BufRead) -> io::Result<Vec<RawLine>> {
    let mut lines = Vec::new();
    loop {
        let mut buf = String::new();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        lines.push(RawLine::from_buffer(buf));
    }
    Ok(lines)
}

/// The parts of a POSCAR file that are reproduced verbatim rather than regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoscarMetadata {
    /// Comment, scaling factor and the three lattice vector lines.
    pub header_lines: Vec<RawLine>,
    /// The coordinate-mode marker line exactly as it appears in the file.
    pub mode_line: RawLine,
    /// 0-based index of `mode_line` in the source file.
    pub mode_line_index: usize,
    pub coordinate_mode: CoordinateMode,
}

impl PoscarMetadata {
    /// Extracts the header and mode marker from the lines of a POSCAR file.
    ///
    /// Only the first five lines and the mode marker are inspected, so this also works on
    /// reference files whose coordinate block is not of interest.
    pub fn from_lines(lines: &[RawLine]) -> Result<Self, PoscarError> {
        if lines.len() < HEADER_LINE_COUNT {
            return Err(PoscarError::MissingHeader {
                expected: HEADER_LINE_COUNT,
                found: lines.len(),
            });
        }
        let mode_line_index = find_mode_marker(lines).ok_or(PoscarError::MissingModeMarker)?;
        let mode_line = lines[mode_line_index].clone();
        let coordinate_mode = CoordinateMode::from_marker_line(&mode_line.content)
            .ok_or(PoscarError::MissingModeMarker)?;

        Ok(Self {
            header_lines: lines[..HEADER_LINE_COUNT].to_vec(),
            mode_line,
            mode_line_index,
            coordinate_mode,
        })
    }

    pub fn from_reader(reader: &mut impl BufRead) -> Result<Self, PoscarError> {
        let lines = read_raw_lines(reader)?;
        Self::from_lines(&lines)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PoscarError> {
        let file = File::open(path)?;
        Self::from_reader(&mut BufReader::new(file))
    }
}

#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PoscarParseErrorKind,
    },
    #[error("File is too short: expected at least {expected} header lines, found {found}")]
    MissingHeader { expected: usize, found: usize },
    #[error("No coordinate-mode line containing 'Direct' or 'Cartesian' was found")]
    MissingModeMarker,
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Table cannot be written as POSCAR: {0}")]
    Table(#[from] TableError),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoscarParseErrorKind {
    #[error("Invalid species count '{value}'")]
    InvalidCount { value: String },
    #[error("Invalid coordinate value '{value}'")]
    InvalidCoordinate { value: String },
    #[error("Coordinate line must have exactly 3 fields, found {found}")]
    WrongFieldCount { found: usize },
}

/// Returns the index of the last line containing a coordinate-mode marker.
///
/// The last match wins, so a comment line that happens to mention "Direct" or
/// "Cartesian" never shadows the real marker further down.
pub fn find_mode_marker<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    lines
        .iter()
        .rposition(|line| MODE_MARKERS.iter().any(|m| line.as_ref().contains(m)))
}

fn parse_species_blocks(lines: &[RawLine]) -> Result<Vec<(String, usize)>, PoscarError> {
    let names: Vec<&str> = lines[SPECIES_LINE_INDEX].content.split_whitespace().collect();
    let counts = lines[COUNTS_LINE_INDEX]
        .content
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| PoscarError::Parse {
                line: COUNTS_LINE_INDEX + 1,
                kind: PoscarParseErrorKind::InvalidCount {
                    value: token.into(),
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if names.len() != counts.len() {
        return Err(PoscarError::Inconsistency(format!(
            "{} species names on line {} but {} counts on line {}",
            names.len(),
            SPECIES_LINE_INDEX + 1,
            counts.len(),
            COUNTS_LINE_INDEX + 1
        )));
    }

    Ok(names
        .into_iter()
        .map(String::from)
        .zip(counts)
        .collect())
}

fn parse_coordinate_line(line: &str, line_num: usize) -> Result<Point3<f64>, PoscarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(PoscarError::Parse {
            line: line_num,
            kind: PoscarParseErrorKind::WrongFieldCount {
                found: fields.len(),
            },
        });
    }
    let parse = |value: &str| -> Result<f64, PoscarError> {
        value.parse().map_err(|_| PoscarError::Parse {
            line: line_num,
            kind: PoscarParseErrorKind::InvalidCoordinate {
                value: value.into(),
            },
        })
    };
    Ok(Point3::new(
        parse(fields[0])?,
        parse(fields[1])?,
        parse(fields[2])?,
    ))
}

pub struct PoscarFile;

impl StructureFile for PoscarFile {
    type Metadata = PoscarMetadata;
    type WriteOptions = PoscarWriteOptions;
    type Error = PoscarError;

    fn read_from(reader: &mut impl BufRead) -> Result<(AtomTable, Self::Metadata), Self::Error> {
        let lines = read_raw_lines(reader)?;
        if lines.len() <= COUNTS_LINE_INDEX {
            return Err(PoscarError::MissingHeader {
                expected: COUNTS_LINE_INDEX + 1,
                found: lines.len(),
            });
        }

        let species = parse_species_blocks(&lines)?;
        let metadata = PoscarMetadata::from_lines(&lines)?;
        if metadata.mode_line_index <= COUNTS_LINE_INDEX {
            return Err(PoscarError::Inconsistency(format!(
                "coordinate-mode line {} precedes the species count line",
                metadata.mode_line_index + 1
            )));
        }

        let symbols: Vec<&str> = species
            .iter()
            .flat_map(|(name, count)| std::iter::repeat_n(name.as_str(), *count))
            .collect();

        let positions = lines
            .iter()
            .enumerate()
            .skip(metadata.mode_line_index + 1)
            .filter(|(_, line)| !line.content.trim().is_empty())
            .map(|(idx, line)| parse_coordinate_line(&line.content, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if positions.len() != symbols.len() {
            return Err(PoscarError::Inconsistency(format!(
                "header declares {} atoms but {} coordinate lines follow the mode line",
                symbols.len(),
                positions.len()
            )));
        }

        let table = AtomTable::from_records(
            positions
                .into_iter()
                .zip(symbols)
                .enumerate()
                .map(|(i, (position, symbol))| AtomRecord::new((i + 1).to_string(), position, symbol))
                .collect(),
        );

        debug!(
            "Read {} atoms in {} species blocks ({} coordinates).",
            table.len(),
            species.len(),
            metadata.coordinate_mode
        );
        Ok((table, metadata))
    }

    fn write_to(
        table: &AtomTable,
        metadata: &Self::Metadata,
        options: &Self::WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if table.is_empty() {
            return Err(PoscarError::MissingRecord("atom records".into()));
        }
        let blocks = table.species_blocks()?;

        for line in &metadata.header_lines {
            line.write_to(writer)?;
        }
        writeln!(
            writer,
            "  {}",
            blocks.iter().map(|b| b.symbol.as_str()).join("   ")
        )?;
        writeln!(writer, "   {}", blocks.iter().map(|b| b.count).join("   "))?;
        metadata.mode_line.write_to(writer)?;
        for row in render_coordinate_rows(table, options) {
            writeln!(writer, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SI_O: &str = "\
SiO2 test cell
1.0
  4.9   0.0   0.0
  0.0   4.9   0.0
  0.0   0.0   5.4
  Si   O
   2   4
Direct
  0.000000   0.000000   0.000000
  0.500000   0.500000   0.500000
  0.250000   0.250000   0.250000
  0.750000   0.750000   0.250000
  0.250000   0.750000   0.750000
  0.750000   0.250000   0.750000
";

    fn read(content: &str) -> Result<(AtomTable, PoscarMetadata), PoscarError> {
        PoscarFile::read_from(&mut Cursor::new(content))
    }

    fn write(table: &AtomTable, metadata: &PoscarMetadata) -> String {
        let mut out = Vec::new();
        PoscarFile::write_to(table, metadata, &PoscarWriteOptions::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn read_expands_species_counts_into_symbols() {
        let (table, _) = read(SI_O).unwrap();
        assert_eq!(table.len(), 6);
        let symbols: Vec<&str> = table.iter().map(|r| r.atom_symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Si", "Si", "O", "O", "O", "O"]);
    }

    #[test]
    fn read_assigns_sequential_text_ids_from_one() {
        let (table, _) = read(SI_O).unwrap();
        let ids: Vec<&str> = table.iter().map(|r| r.atom_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn read_starts_coordinates_after_mode_line() {
        let (table, metadata) = read(SI_O).unwrap();
        assert_eq!(metadata.mode_line_index, 7);
        assert_eq!(metadata.mode_line.content, "Direct");
        assert_eq!(metadata.coordinate_mode, CoordinateMode::Direct);
        assert_eq!(table.records()[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(table.records()[3].position, Point3::new(0.75, 0.75, 0.25));
    }

    #[test]
    fn read_keeps_header_lines_verbatim() {
        let (_, metadata) = read(SI_O).unwrap();
        assert_eq!(metadata.header_lines.len(), HEADER_LINE_COUNT);
        assert_eq!(metadata.header_lines[0].content, "SiO2 test cell");
        assert_eq!(metadata.header_lines[2].content, "  4.9   0.0   0.0");
    }

    #[test]
    fn read_ignores_trailing_blank_lines() {
        let content = format!("{}\n\n   \n", SI_O);
        let (table, _) = read(&content).unwrap();
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn read_uses_last_mode_marker_line() {
        let content = "\
Cartesian cell
1.0
1 0 0
0 1 0
0 0 1
Fe
1
Cartesian
Cartesian
0.1 0.2 0.3
";
        let (table, metadata) = read(content).unwrap();
        assert_eq!(metadata.mode_line_index, 8);
        assert_eq!(metadata.coordinate_mode, CoordinateMode::Cartesian);
        assert_eq!(table.len(), 1);

        let reference = PoscarMetadata::from_reader(&mut Cursor::new(content)).unwrap();
        assert_eq!(reference.mode_line_index, metadata.mode_line_index);
    }

    #[test]
    fn read_fails_without_mode_marker() {
        let content = SI_O.replace("Direct", "Fractional");
        assert!(matches!(read(&content), Err(PoscarError::MissingModeMarker)));
    }

    #[test]
    fn read_fails_on_non_integer_count() {
        let content = SI_O.replace("   2   4", "   2   four");
        match read(&content) {
            Err(PoscarError::Parse { line, kind }) => {
                assert_eq!(line, 7);
                assert_eq!(
                    kind,
                    PoscarParseErrorKind::InvalidCount {
                        value: "four".into()
                    }
                );
            }
            other => panic!("expected count parse error, got {:?}", other),
        }
    }

    #[test]
    fn read_fails_on_coordinate_line_with_wrong_field_count() {
        let content = SI_O.replace(
            "  0.500000   0.500000   0.500000",
            "  0.500000   0.500000   0.500000   T",
        );
        match read(&content) {
            Err(PoscarError::Parse { line, kind }) => {
                assert_eq!(line, 10);
                assert_eq!(kind, PoscarParseErrorKind::WrongFieldCount { found: 4 });
            }
            other => panic!("expected field count error, got {:?}", other),
        }
    }

    #[test]
    fn read_fails_on_non_numeric_coordinate() {
        let content = SI_O.replace("  0.250000   0.250000   0.250000", "  0.25   abc   0.25");
        assert!(matches!(
            read(&content),
            Err(PoscarError::Parse {
                kind: PoscarParseErrorKind::InvalidCoordinate { .. },
                ..
            })
        ));
    }

    #[test]
    fn read_fails_when_coordinate_count_differs_from_header() {
        let content = SI_O.replace("   2   4", "   2   5");
        assert!(matches!(read(&content), Err(PoscarError::Inconsistency(_))));
    }

    #[test]
    fn read_fails_when_species_and_counts_differ_in_length() {
        let content = SI_O.replace("  Si   O", "  Si   O   N");
        assert!(matches!(read(&content), Err(PoscarError::Inconsistency(_))));
    }

    #[test]
    fn read_fails_on_truncated_header() {
        assert!(matches!(
            read("comment\n1.0\n"),
            Err(PoscarError::MissingHeader { found: 2, .. })
        ));
    }

    #[test]
    fn write_derives_species_and_count_lines_from_table() {
        let (_, metadata) = read(SI_O).unwrap();
        let table = AtomTable::from_records(vec![
            AtomRecord::new("1", Point3::new(0.0, 0.0, 0.0), "Fe"),
            AtomRecord::new("2", Point3::new(0.5, 0.5, 0.0), "Fe"),
            AtomRecord::new("3", Point3::new(0.5, 0.0, 0.5), "Al"),
        ]);
        let out = write(&table, &metadata);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[5], "  Fe   Al");
        assert_eq!(lines[6], "   2   1");
        assert_eq!(lines[7], "Direct");
        assert_eq!(lines[8], "  0.000000   0.000000   0.000000");
        assert_eq!(lines.len(), 11);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn write_rejects_non_contiguous_species() {
        let (_, metadata) = read(SI_O).unwrap();
        let table = AtomTable::from_records(vec![
            AtomRecord::new("1", Point3::origin(), "Fe"),
            AtomRecord::new("2", Point3::origin(), "Al"),
            AtomRecord::new("3", Point3::origin(), "Fe"),
        ]);
        let mut out = Vec::new();
        let result =
            PoscarFile::write_to(&table, &metadata, &PoscarWriteOptions::default(), &mut out);
        assert!(matches!(
            result,
            Err(PoscarError::Table(TableError::NonContiguousSpecies { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn write_rejects_empty_table() {
        let (_, metadata) = read(SI_O).unwrap();
        let mut out = Vec::new();
        let result = PoscarFile::write_to(
            &AtomTable::new(),
            &metadata,
            &PoscarWriteOptions::default(),
            &mut out,
        );
        assert!(matches!(result, Err(PoscarError::MissingRecord(_))));
    }

    #[test]
    fn read_then_write_reproduces_the_source() {
        let (table, metadata) = read(SI_O).unwrap();
        let out = write(&table, &metadata);
        assert_eq!(out, SI_O);
    }

    #[test]
    fn count_line_sums_to_row_count() {
        let (table, metadata) = read(SI_O).unwrap();
        let out = write(&table, &metadata);
        let total: usize = out
            .lines()
            .nth(6)
            .unwrap()
            .split_whitespace()
            .map(|c| c.parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn metadata_requires_five_header_lines() {
        assert!(matches!(
            PoscarMetadata::from_reader(&mut Cursor::new("Direct\n1.0\n")),
            Err(PoscarError::MissingHeader {
                expected: 5,
                found: 2
            })
        ));
    }

    #[test]
    fn crlf_header_and_mode_lines_are_copied_byte_for_byte() {
        let crlf = SI_O.replace('\n', "\r\n");
        let (table, metadata) = read(&crlf).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(metadata.header_lines[0].ending, LineEnding::CrLf);

        let out = write(&table, &metadata);
        assert!(out.starts_with("SiO2 test cell\r\n1.0\r\n  4.9   0.0   0.0\r\n"));
        assert!(out.contains("\n   2   4\nDirect\r\n  0.000000"));
    }

    #[test]
    fn final_line_without_trailing_newline_is_terminated_on_write() {
        let content = SI_O.trim_end();
        let lines = read_raw_lines(&mut Cursor::new(content)).unwrap();
        assert_eq!(lines.last().unwrap().ending, LineEnding::Missing);

        let (table, metadata) = read(content).unwrap();
        assert_eq!(write(&table, &metadata), SI_O);
    }
}
