//! Description of a monitored process run

use std::path::{Path, PathBuf};

/// Everything the monitored engine needs to run and judge one process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessRun {
    /// Program followed by its arguments
    pub argv: Vec<String>,

    /// Working directory, the current one if unset
    pub cwd: Option<PathBuf>,

    /// Only echo lines containing this substring
    pub filter: Option<String>,

    /// Seeing this line fragment makes the run successful, whatever the
    /// exit code
    pub success_marker: Option<String>,

    /// Seeing this line fragment makes the run fail, whatever else happened
    pub failure_marker: Option<String>,

    /// On failure the full output goes here and only the tail is echoed
    pub error_log: Option<PathBuf>,

    /// Number of trailing lines echoed when `error_log` is set
    pub tail_lines: usize,
}

impl ProcessRun {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn success_marker(mut self, marker: impl Into<String>) -> Self {
        self.success_marker = Some(marker.into());
        self
    }

    pub fn failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.failure_marker = Some(marker.into());
        self
    }

    pub fn error_log(mut self, path: impl Into<PathBuf>, tail_lines: usize) -> Self {
        self.error_log = Some(path.into());
        self.tail_lines = tail_lines;
        self
    }

    /// Human readable command line, used for echo and error messages
    pub fn command_line(&self) -> String {
        self.argv
            .iter()
            .map(|a| crate::shell::quote_arg(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let run = ProcessRun::new(["gdb", "-batch", "--args", "bin/TestsServer"])
            .success_marker("exited normally")
            .failure_marker("!!! Test")
            .filter(Some(String::new()))
            .error_log("build/TestsServer.log", 40);

        assert_eq!(run.argv.len(), 4);
        assert_eq!(run.filter, None);
        assert_eq!(run.tail_lines, 40);
        assert_eq!(run.success_marker.as_deref(), Some("exited normally"));
    }

    #[test]
    fn test_command_line_quotes_spaces() {
        let run = ProcessRun::new(["lldb", "-k", "thread backtrace all"]);
        assert_eq!(run.command_line(), "lldb -k \"thread backtrace all\"");
    }
}
