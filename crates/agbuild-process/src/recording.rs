//! A runner that records commands instead of executing them

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ProcessError, Result};
use crate::monitor::MonitorVerdict;
use crate::run::ProcessRun;
use crate::runner::Runner;

/// A command seen by a [`RecordingRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Simple {
        command: String,
        cwd: Option<PathBuf>,
    },
    Capture {
        command: String,
    },
    Monitored(ProcessRun),
}

impl RecordedCall {
    pub fn command(&self) -> String {
        match self {
            Self::Simple { command, .. } | Self::Capture { command } => command.clone(),
            Self::Monitored(run) => run.command_line(),
        }
    }
}

/// Records every command and answers from canned results.
///
/// Captures return the output registered with [`RecordingRunner::with_capture`]
/// and fail otherwise. Any command containing a substring registered with
/// [`RecordingRunner::fail_when`] fails.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<RecordedCall>>,
    captures: HashMap<String, String>,
    failures: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.captures.insert(command.into(), output.into());
        self
    }

    pub fn fail_when(mut self, fragment: impl Into<String>) -> Self {
        self.failures.push(fragment.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Command lines of every call, in order
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(RecordedCall::command).collect()
    }

    fn should_fail(&self, command: &str) -> bool {
        self.failures.iter().any(|f| command.contains(f.as_str()))
    }
}

impl Runner for RecordingRunner {
    fn simple(&self, command_line: &str, cwd: Option<&Path>) -> Result<()> {
        self.calls.borrow_mut().push(RecordedCall::Simple {
            command: command_line.to_string(),
            cwd: cwd.map(Path::to_path_buf),
        });
        if self.should_fail(command_line) {
            return Err(ProcessError::CommandFailed {
                command: command_line.to_string(),
                code: 1,
            });
        }
        Ok(())
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(RecordedCall::Capture {
            command: command.clone(),
        });
        match self.captures.get(&command) {
            Some(output) if !self.should_fail(&command) => Ok(output.clone()),
            _ => Err(ProcessError::CommandFailed { command, code: 1 }),
        }
    }

    fn monitored(&self, run: &ProcessRun) -> Result<MonitorVerdict> {
        self.calls
            .borrow_mut()
            .push(RecordedCall::Monitored(run.clone()));
        let command = run.command_line();
        if self.should_fail(&command) {
            return Err(ProcessError::MonitoredFailure {
                command,
                exit_code: 1,
                error_log: run.error_log.clone(),
            });
        }
        Ok(MonitorVerdict {
            exit_code: Some(0),
            success_marker_seen: run.success_marker.is_some(),
            failure_marker_seen: false,
            success: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let runner = RecordingRunner::new()
            .with_capture("xcode-select -p", "/Library/Developer/CommandLineTools");
        runner.simple("cmake -B build", None).unwrap();
        let out = runner.capture("xcode-select", &["-p"]).unwrap();
        assert_eq!(out, "/Library/Developer/CommandLineTools");
        assert_eq!(runner.commands(), ["cmake -B build", "xcode-select -p"]);
    }

    #[test]
    fn test_fail_when() {
        let runner = RecordingRunner::new().fail_when("dsymutil");
        assert!(runner.simple("cmake --build b", None).is_ok());
        assert!(runner.simple("dsymutil -o x y", None).is_err());
        assert!(runner.capture("uname", &["-m"]).is_err());
    }
}
