//! Error types for pipeline stages

use std::path::PathBuf;

use agbuild_core::{AgbuildError, ConfigError};
use agbuild_process::ProcessError;
use agbuild_signing::SigningError;
use thiserror::Error;

/// Result type for stage operations
pub type Result<T> = std::result::Result<T, StageError>;

/// Stage errors
#[derive(Error, Debug)]
pub enum StageError {
    /// A test binary was not built
    #[error("Test binary not found: {0}")]
    MissingTestBinary(PathBuf),

    /// A directory a stage reads from does not exist
    #[error("{what} does not exist: {path}")]
    MissingDirectory { what: String, path: PathBuf },

    /// A file a stage copies or packages does not exist
    #[error("Expected file not found: {0}")]
    MissingFile(PathBuf),

    /// Fixture download failed
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Reading or writing a zip archive failed
    #[error("Archive error for {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error(transparent)]
    Config(#[from] AgbuildError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for StageError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.into())
    }
}

impl StageError {
    /// Create a missing directory error
    pub fn missing_directory(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Create an archive error
    pub fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
