//! agbuild process - process execution and output monitoring
//!
//! Every external tool the pipeline drives goes through a [`Runner`]. The
//! host implementation runs real processes in one of three modes:
//!
//! - simple: run a shell command line, fail on nonzero exit
//! - capture: run a program and return its trimmed stdout
//! - monitored: stream merged stdout/stderr, filter and classify it, and
//!   decide success from markers or the exit code

pub mod error;
pub mod monitor;
pub mod progress;
pub mod recording;
pub mod run;
pub mod runner;
pub mod shell;

pub use error::{ProcessError, Result};
pub use monitor::{run_monitored, MonitorVerdict, OutputMonitor};
pub use progress::ProgressWriter;
pub use recording::{RecordedCall, RecordingRunner};
pub use run::ProcessRun;
pub use runner::{HostRunner, Runner};
pub use shell::{mask_secrets, quote_arg, shell_command};
