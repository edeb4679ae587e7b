//! Monitored execution: stream, filter and classify process output

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use console::truncate_str;
use tracing::{debug, error, warn};

use crate::error::{ProcessError, Result};
use crate::progress::ProgressWriter;
use crate::run::ProcessRun;

/// Widest status line drawn for output hidden by a filter
const STATUS_WIDTH: usize = 100;

/// Outcome of a monitored run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorVerdict {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    pub success_marker_seen: bool,
    pub failure_marker_seen: bool,
    pub success: bool,
}

/// Tracks the output of one run and decides whether it succeeded
#[derive(Debug)]
pub struct OutputMonitor<'a> {
    run: &'a ProcessRun,
    buffer: Vec<String>,
    success_marker_seen: bool,
    failure_marker_seen: bool,
}

impl<'a> OutputMonitor<'a> {
    pub fn new(run: &'a ProcessRun) -> Self {
        Self {
            run,
            buffer: Vec::new(),
            success_marker_seen: false,
            failure_marker_seen: false,
        }
    }

    /// Record a line. Returns true if it should be echoed.
    pub fn observe(&mut self, line: &str) -> bool {
        if let Some(marker) = &self.run.success_marker {
            if line.contains(marker.as_str()) {
                self.success_marker_seen = true;
            }
        }
        if let Some(marker) = &self.run.failure_marker {
            if line.contains(marker.as_str()) {
                self.failure_marker_seen = true;
            }
        }
        self.buffer.push(line.to_string());

        match &self.run.filter {
            Some(filter) => line.contains(filter.as_str()),
            None => true,
        }
    }

    /// Decide the outcome.
    ///
    /// A configured success marker replaces the exit code check. A failure
    /// marker fails the run no matter what.
    pub fn verdict(&self, exit_code: Option<i32>) -> MonitorVerdict {
        let success = if self.failure_marker_seen {
            false
        } else if self.run.success_marker.is_some() {
            self.success_marker_seen
        } else {
            exit_code == Some(0)
        };

        MonitorVerdict {
            exit_code,
            success_marker_seen: self.success_marker_seen,
            failure_marker_seen: self.failure_marker_seen,
            success,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.buffer
    }

    /// The last `n` buffered lines
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.buffer.len().saturating_sub(n);
        &self.buffer[start..]
    }
}

/// Run a process in monitored mode.
///
/// stdout and stderr are merged line by line. On failure the output is
/// dumped (or its tail echoed and the whole written to the error log) and
/// [`ProcessError::MonitoredFailure`] is returned.
pub fn run_monitored<W: Write>(
    run: &ProcessRun,
    progress: &mut ProgressWriter<W>,
) -> Result<MonitorVerdict> {
    let command_line = run.command_line();
    let (program, args) = run
        .argv
        .split_first()
        .ok_or_else(|| ProcessError::spawn("", std::io::ErrorKind::InvalidInput.into()))?;

    progress.line(&format!("{} {}", console::style(">>>").cyan(), command_line))?;
    debug!(command = %command_line, filter = ?run.filter, "starting monitored run");

    let mut cmd = Command::new(program);
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(cwd) = &run.cwd {
        cmd.current_dir(cwd);
    }
    let mut child = cmd
        .spawn()
        .map_err(|e| ProcessError::spawn(&command_line, e))?;

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, tx.clone()));
    }
    drop(tx);

    let mut monitor = OutputMonitor::new(run);
    for line in rx {
        if monitor.observe(&line) {
            progress.line(&line)?;
        } else {
            progress.status(&truncate_str(&line, STATUS_WIDTH, "..."))?;
        }
    }
    progress.clear_status()?;

    for reader in readers {
        if reader.join().is_err() {
            warn!(command = %command_line, "output reader thread panicked, output may be incomplete");
        }
    }
    let status = child.wait()?;
    let verdict = monitor.verdict(status.code());

    if verdict.success {
        if verdict.exit_code != Some(0) {
            warn!(
                command = %command_line,
                exit_code = ?verdict.exit_code,
                "success marker seen but process exited with nonzero code"
            );
        }
        return Ok(verdict);
    }

    error!(
        command = %command_line,
        exit_code = ?verdict.exit_code,
        success_marker_seen = verdict.success_marker_seen,
        failure_marker_seen = verdict.failure_marker_seen,
        "monitored run failed"
    );
    dump_failure(run, &monitor, progress)?;

    Err(ProcessError::MonitoredFailure {
        command: command_line,
        exit_code: verdict.exit_code.unwrap_or(-1),
        error_log: run.error_log.clone(),
    })
}

/// Echo the output of a failed run, or write it to the error log and echo
/// only its tail
fn dump_failure<W: Write>(
    run: &ProcessRun,
    monitor: &OutputMonitor<'_>,
    progress: &mut ProgressWriter<W>,
) -> Result<()> {
    let shown = match &run.error_log {
        Some(path) => {
            let mut content = monitor.lines().join("\n");
            content.push('\n');
            std::fs::write(path, content)?;
            monitor.tail(run.tail_lines)
        }
        None => monitor.lines(),
    };

    progress.line(&console::style("output:").red().bold().to_string())?;
    for line in shown {
        progress.line(line)?;
    }
    if let Some(path) = &run.error_log {
        progress.line(&format!(
            "(last {} lines shown, full output in {})",
            shown.len(),
            path.display()
        ))?;
    }
    Ok(())
}

fn spawn_reader<R: Read + Send + 'static>(source: R, tx: Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
