//! Test runner with crash introspection
//!
//! Each test binary runs in monitored mode, wrapped in the host debugger when
//! one is available. A binary is checked for at the point it is about to run,
//! so binaries listed before a missing one have already been executed.

pub mod debugger;
pub mod fixtures;

pub use debugger::{on_path, Debugger};
pub use fixtures::ensure_fixtures;

use std::path::PathBuf;

use agbuild_process::{ProcessRun, Runner};
use tracing::info;

use crate::context::TestContext;
use crate::error::{Result, StageError};

/// Test binaries, in the order they run
pub const TEST_BINARIES: [&str; 2] = ["TestsServer", "TestsPluginFx"];

/// Prefix the test harness prints for a failed expectation
pub const FAILURE_MARKER: &str = "!!! Test";

/// Path of a test binary inside the build tree
pub fn test_binary(ctx: &TestContext, name: &str) -> PathBuf {
    let suffix = ctx.target.identity.platform.exe_suffix();
    ctx.target.bin_dir().join(format!("{}{}", name, suffix))
}

/// Error log written when a test binary fails
pub fn error_log(ctx: &TestContext, name: &str) -> PathBuf {
    ctx.target
        .build_dir()
        .join(format!("{}-{}.log", name, ctx.target.identity.platform_arch()))
}

/// The monitored run for one test binary
pub fn test_run(ctx: &TestContext, name: &str, debugger: Option<Debugger>) -> Result<ProcessRun> {
    let binary = test_binary(ctx, name);
    if !binary.is_file() {
        return Err(StageError::MissingTestBinary(binary));
    }
    let binary = binary.to_string_lossy().into_owned();

    let mut run = match debugger {
        Some(debugger) => {
            ProcessRun::new(debugger.wrap(&binary)).success_marker(debugger.success_marker())
        }
        None => ProcessRun::new([binary]),
    };
    run = run
        .cwd(&ctx.target.root)
        .filter(ctx.output_filter.clone())
        .failure_marker(FAILURE_MARKER)
        .error_log(error_log(ctx, name), ctx.tail_lines);
    Ok(run)
}

/// Run every test binary, stopping at the first failure.
///
/// `available` reports whether a program is on `PATH` and decides whether a
/// debugger wraps the binaries.
pub fn run_tests(
    ctx: &TestContext,
    runner: &dyn Runner,
    available: impl Fn(&str) -> bool,
) -> Result<()> {
    let debugger = if ctx.use_debugger {
        Debugger::detect(ctx.target.identity.platform, available)
    } else {
        None
    };
    match debugger {
        Some(d) => info!(debugger = d.program(), "running tests under debugger"),
        None => info!("running tests without debugger"),
    }

    for name in TEST_BINARIES {
        let run = test_run(ctx, name, debugger)?;
        runner.line(&format!("Running {} ...", name));
        runner.monitored(&run)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Target;
    use agbuild_core::{BuildIdentity, BuildLayout, Platform};
    use agbuild_process::{ProcessError, RecordedCall, RecordingRunner};
    use std::path::Path;
    use tempfile::TempDir;

    fn context(root: &Path, platform: Platform) -> TestContext {
        let identity = BuildIdentity::new(platform, "x86_64", None);
        let layout = BuildLayout::new(&identity, None);
        TestContext {
            target: Target::new(root, identity, layout),
            output_filter: None,
            use_debugger: true,
            tail_lines: 40,
        }
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_runs_both_binaries_under_gdb() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), Platform::Linux);
        for name in TEST_BINARIES {
            touch(&test_binary(&ctx, name));
        }

        let runner = RecordingRunner::new();
        run_tests(&ctx, &runner, |p| p == "gdb").unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        let RecordedCall::Monitored(run) = &calls[0] else {
            panic!("expected a monitored run");
        };
        assert_eq!(run.argv[0], "gdb");
        assert!(run.argv.last().unwrap().ends_with("bin/TestsServer"));
        assert_eq!(run.success_marker.as_deref(), Some("exited normally"));
        assert_eq!(run.failure_marker.as_deref(), Some(FAILURE_MARKER));
        assert_eq!(
            run.error_log.as_deref(),
            Some(temp.path().join("build-linux-x86_64/TestsServer-linux-x86_64.log").as_path())
        );
        assert_eq!(run.tail_lines, 40);
        assert_eq!(run.cwd.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_missing_debugger_runs_binary_directly() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), Platform::Linux);
        for name in TEST_BINARIES {
            touch(&test_binary(&ctx, name));
        }

        let runner = RecordingRunner::new();
        run_tests(&ctx, &runner, |_| false).unwrap();

        let RecordedCall::Monitored(run) = &runner.calls()[1] else {
            panic!("expected a monitored run");
        };
        assert_eq!(run.argv.len(), 1);
        assert!(run.argv[0].ends_with("TestsPluginFx"));
        assert!(run.success_marker.is_none());
    }

    #[test]
    fn test_windows_binaries_have_suffix() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), Platform::Windows);
        assert!(test_binary(&ctx, "TestsServer").ends_with("bin/TestsServer.exe"));
    }

    #[test]
    fn test_missing_binary_checked_at_point_of_use() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), Platform::Linux);
        touch(&test_binary(&ctx, "TestsServer"));

        let runner = RecordingRunner::new();
        let err = run_tests(&ctx, &runner, |_| true).unwrap_err();

        assert!(matches!(&err, StageError::MissingTestBinary(p) if p.ends_with("TestsPluginFx")));
        assert!(err.to_string().contains("TestsPluginFx"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_failure_stops_the_run() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), Platform::Linux);
        for name in TEST_BINARIES {
            touch(&test_binary(&ctx, name));
        }

        let runner = RecordingRunner::new().fail_when("TestsServer");
        let err = run_tests(&ctx, &runner, |_| false).unwrap_err();
        assert!(matches!(
            err,
            StageError::Process(ProcessError::MonitoredFailure { .. })
        ));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_output_filter_is_passed_through() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(temp.path(), Platform::Linux);
        ctx.output_filter = Some("[TEST]".to_string());
        touch(&test_binary(&ctx, "TestsServer"));

        let run = test_run(&ctx, "TestsServer", None).unwrap();
        assert_eq!(run.filter.as_deref(), Some("[TEST]"));
    }
}
