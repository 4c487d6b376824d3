use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "poscartab - Convert VASP POSCAR structure files to and from a flat table of atom records.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a POSCAR file into a CSV table of atom records.
    ToTable(ToTableArgs),
    /// Write a CSV table of atom records as a POSCAR file, reusing a reference header.
    ToPoscar(ToPoscarArgs),
    /// Parse a POSCAR file and write it back out with normalized coordinate formatting.
    Reformat(ReformatArgs),
    /// Show the coordinate mode and species blocks of a POSCAR file.
    Info(InfoArgs),
}

/// Arguments for the `to-table` subcommand.
#[derive(Args, Debug)]
pub struct ToTableArgs {
    /// Path to the input POSCAR file [default: ./POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path for the output CSV table. Printed to stdout if omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `to-poscar` subcommand.
#[derive(Args, Debug)]
pub struct ToPoscarArgs {
    /// Path to the CSV table of atom records.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub table: PathBuf,

    /// POSCAR file whose header and coordinate-mode line are reused [default: ./POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Path for the generated POSCAR file [default: ./gen_data/POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of decimal places for coordinates, overriding the config file.
    #[arg(short, long, value_name = "INT")]
    pub precision: Option<usize>,
}

/// Arguments for the `reformat` subcommand.
#[derive(Args, Debug)]
pub struct ReformatArgs {
    /// Path to the input POSCAR file, also used as the header reference [default: ./POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path for the generated POSCAR file [default: ./gen_data/POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of decimal places for coordinates, overriding the config file.
    #[arg(short, long, value_name = "INT")]
    pub precision: Option<usize>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input POSCAR file [default: ./POSCAR].
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}
