//! Session configuration.
//!
//! Loaded from a JSON file by the host; every field is optional and falls
//! back to [`GameConfig::default`].
//!
//! ```json
//! { "seed": 42, "viewport_width": 40, "viewport_height": 24 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{MAP_HEIGHT, MAP_WIDTH};

/// Error loading a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The viewport does not fit the map.
    #[error("viewport {width}x{height} must be between 1x1 and {MAP_WIDTH}x{MAP_HEIGHT}")]
    InvalidViewport {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
}

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seed for world generation and every roll of the session.
    pub seed: u64,
    /// Columns of the world view.
    pub viewport_width: u16,
    /// Rows of the world view.
    pub viewport_height: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            viewport_width: 30,
            viewport_height: 20,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// [`ConfigError::InvalidViewport`] for a viewport that doesn't fit.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file can't be read, otherwise as
    /// [`GameConfig::from_json_str`].
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that the viewport fits the map.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidViewport`] if either side is zero or larger than the map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.viewport_width, self.viewport_height);
        if width == 0 || height == 0 || width > MAP_WIDTH || height > MAP_HEIGHT {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.seed, 1);
        assert_eq!((config.viewport_width, config.viewport_height), (30, 20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json_str(r#"{ "seed": 99 }"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.viewport_width, 30);
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = GameConfig::from_json_str(r#"{ "viewport_width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViewport { width: 0, .. }));
        let err = GameConfig::from_json_str(r#"{ "viewport_height": 65 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViewport { height: 65, .. }));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = GameConfig::from_json_str(r#"{ "sead": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fauna.json");
        fs::write(&path, r#"{ "seed": 5, "viewport_width": 80, "viewport_height": 64 }"#).unwrap();
        let config = GameConfig::load_from_path(&path).unwrap();
        assert_eq!(config.seed, 5);

        let missing = GameConfig::load_from_path(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
