use crate::error::{CliError, Result};
use poscartab::core::io::format::{PoscarWriteOptions, PoscarWriteOptionsBuilder};
use poscartab::workflows::convert::{DEFAULT_OUTPUT_PATH, DEFAULT_POSCAR_PATH};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialFormatConfig {
    precision: Option<usize>,
    separator_width: Option<usize>,
    indent: Option<usize>,
    min_column_width: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialPathsConfig {
    input: Option<PathBuf>,
    reference: Option<PathBuf>,
    output: Option<PathBuf>,
}

/// Settings read from the optional TOML configuration file.
///
/// Every value is optional; command-line flags take precedence over the file, and the file
/// takes precedence over the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    format: PartialFormatConfig,
    #[serde(default)]
    paths: PartialPathsConfig,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {:?}: {:?}", path, &config);
        Ok(config)
    }

    /// The POSCAR file to parse.
    pub fn input_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.paths.input.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POSCAR_PATH))
    }

    /// The POSCAR file whose header is reused; falls back to the configured input.
    pub fn reference_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.paths.reference.clone())
            .unwrap_or_else(|| self.input_path(None))
    }

    pub fn output_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.paths.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    }

    pub fn write_options(&self, cli_precision: Option<usize>) -> Result<PoscarWriteOptions> {
        let format = &self.format;
        let mut builder = PoscarWriteOptionsBuilder::new();
        if let Some(precision) = cli_precision.or(format.precision) {
            builder = builder.precision(precision);
        }
        if let Some(width) = format.separator_width {
            builder = builder.separator_width(width);
        }
        if let Some(indent) = format.indent {
            builder = builder.indent(indent);
        }
        if let Some(width) = format.min_column_width {
            builder = builder.min_column_width(width);
        }
        Ok(builder.build()?)
    }
}
