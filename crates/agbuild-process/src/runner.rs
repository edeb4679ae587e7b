//! The runner seam between pipeline stages and the host

use std::cell::RefCell;
use std::io::Stdout;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{ProcessError, Result};
use crate::monitor::{run_monitored, MonitorVerdict};
use crate::progress::ProgressWriter;
use crate::run::ProcessRun;
use crate::shell::{mask_secrets, shell_command};

/// Executes external commands on behalf of the pipeline stages
pub trait Runner {
    /// Run a shell command line, echoing it first. Nonzero exit is an error.
    fn simple(&self, command_line: &str, cwd: Option<&Path>) -> Result<()>;

    /// Run a program and return its trimmed stdout
    fn capture(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Run a program in monitored mode
    fn monitored(&self, run: &ProcessRun) -> Result<MonitorVerdict>;

    /// Print a message line for the user
    fn line(&self, _text: &str) {}
}

/// Runs real processes and writes progress to stdout
#[derive(Debug)]
pub struct HostRunner {
    progress: RefCell<ProgressWriter<Stdout>>,
}

impl HostRunner {
    pub fn new() -> Self {
        Self {
            progress: RefCell::new(ProgressWriter::stdout()),
        }
    }
}

impl Default for HostRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for HostRunner {
    fn simple(&self, command_line: &str, cwd: Option<&Path>) -> Result<()> {
        let shown = mask_secrets(command_line);
        self.progress
            .borrow_mut()
            .line(&format!("{} {}", console::style(">>>").cyan(), shown))?;

        let mut cmd = shell_command(command_line);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let status = cmd.status().map_err(|e| ProcessError::spawn(&shown, e))?;

        if !status.success() {
            return Err(ProcessError::CommandFailed {
                command: shown,
                code: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        // Arguments may carry secrets, only the program is logged
        debug!(program, "capturing output");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ProcessError::spawn(&command, e))?;

        if !output.status.success() {
            return Err(ProcessError::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn monitored(&self, run: &ProcessRun) -> Result<MonitorVerdict> {
        let mut progress = self.progress.borrow_mut();
        run_monitored(run, &mut *progress)
    }

    fn line(&self, text: &str) {
        let _ = self.progress.borrow_mut().line(text);
    }
}
