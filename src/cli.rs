//! CLI command implementations for Fauna.

pub(crate) mod play;
pub(crate) mod script;

use clap::ValueEnum;
use fauna::{ConfigError, GameConfig, InputParseError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `script` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Plain-text frame.
    Text,
    /// Machine-readable JSON frame.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<InputParseError> for CliError {
    fn from(e: InputParseError) -> Self {
        Self::new(format!("bad input script: {e}"))
    }
}

/// Load the config file if given, then apply the seed override.
pub(crate) fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig, CliError> {
    let mut config = match path {
        Some(path) => GameConfig::load_from_path(path)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}
