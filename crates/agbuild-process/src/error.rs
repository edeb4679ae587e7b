//! Process execution errors

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessError>;

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started at all
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A simple or captured command exited unsuccessfully
    #[error("Command exited with code {code}: {command}")]
    CommandFailed { command: String, code: i32 },

    /// A monitored run was classified as failed
    #[error("{command} failed (exit code {exit_code}){}", log_hint(.error_log))]
    MonitoredFailure {
        command: String,
        exit_code: i32,
        error_log: Option<PathBuf>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }
}

fn log_hint(error_log: &Option<PathBuf>) -> String {
    match error_log {
        Some(path) => format!(", see {}", path.display()),
        None => String::new(),
    }
}
