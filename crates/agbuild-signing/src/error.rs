//! Error types for signing operations

use std::path::PathBuf;

use agbuild_process::ProcessError;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing-related errors
#[derive(Debug, Error)]
pub enum SigningError {
    /// The file to sign does not exist
    #[error("Cannot sign {0}: file not found")]
    NotFound(PathBuf),

    /// Tool execution failed
    #[error("Signing tool failed: {tool} - {reason}")]
    ToolFailed { tool: String, reason: String },

    /// Keychain error
    #[error("Keychain error: {0}")]
    KeychainError(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}
