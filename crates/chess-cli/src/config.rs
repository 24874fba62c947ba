//! Configuration file loading for the command-line front end.
//!
//! Settings live in a TOML file (`chess-cli.toml` by default). Every field is
//! optional, and a missing file yields [`CliConfig::default()`].

use chess_search::PieceValues;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A field parsed but its value is unusable.
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Search depth for `play` when `--depth` is not given.
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    /// Deepest perft level run by `bench` when `--depth` is not given.
    #[serde(default = "default_bench_depth")]
    pub bench_depth: u32,
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Material values for the evaluator.
    #[serde(default)]
    pub piece_values: PieceValues,
}

fn default_depth() -> u32 {
    4
}

fn default_bench_depth() -> u32 {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            default_depth: default_depth(),
            bench_depth: default_bench_depth(),
            log_level: default_log_level(),
            piece_values: PieceValues::default(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration at `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// read, [`ConfigError::ParseError`] if it is not valid TOML, and
    /// [`ConfigError::InvalidValue`] if a depth is zero.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bench_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bench_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
