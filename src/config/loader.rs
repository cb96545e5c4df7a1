use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

const APP_DIR: &str = "stdio-recorder";
const FILE_NAME: &str = "config.toml";

/// Why the config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed TOML in '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Parsed fine but holds a value the recorder cannot use.
    #[error("Invalid config: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// `<config dir>/stdio-recorder/config.toml`, or a relative path when the
    /// platform has no config dir.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR))
            .join(FILE_NAME)
    }

    /// Load from [`config_path`](Self::config_path).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load and validate `path`. An absent file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let parsed: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::ValidationError {
                message: message.to_string(),
            })
        };

        if self
            .output
            .path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return invalid("output.path must not be empty");
        }
        if self.logging.filter.trim().is_empty() {
            return invalid("logging.filter must not be empty");
        }
        Ok(())
    }
}
