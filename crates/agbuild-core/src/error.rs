//! Error types for agbuild

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AgbuildError
pub type Result<T> = std::result::Result<T, AgbuildError>;

/// Main error type for identity, path and configuration resolution
#[derive(Debug, Error)]
pub enum AgbuildError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A directory the pipeline cannot run without is missing
    #[error("{what} does not exist: {path}")]
    MissingDirectory { what: String, path: PathBuf },

    /// Host platform could not be determined and none was given
    #[error("Unsupported host platform, pass --platform explicitly")]
    UnknownPlatform,

    /// Malformed platform token, e.g. in a fan-out list
    #[error("Invalid platform token '{token}': {message}")]
    InvalidToken { token: String, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create a missing directory error
    pub fn missing_directory(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Create an invalid token error
    pub fn invalid_token(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToken {
            token: token.into(),
            message: message.into(),
        }
    }
}
