//! Uploading debug symbols to Sentry

use agbuild_core::config::SentryConfig;
use agbuild_process::{quote_arg, Runner};
use tracing::info;

use crate::context::Target;
use crate::error::{Result, StageError};

/// `sentry-cli` command line for a debug symbol directory
pub fn upload_command(target: &Target, sentry: &SentryConfig, auth_token: &str) -> String {
    let debug_dir = target.layout.debug_symbols_dir.to_string_lossy().replace('\\', "/");
    format!(
        "sentry-cli --auth-token {} upload-dif -o {} -p {} {}",
        quote_arg(auth_token),
        quote_arg(&sentry.org),
        quote_arg(&sentry.project),
        quote_arg(&debug_dir)
    )
}

/// Upload the debug symbol directory of a build
pub fn upload_symbols(
    target: &Target,
    sentry: &SentryConfig,
    auth_token: &str,
    runner: &dyn Runner,
) -> Result<()> {
    let debug_dir = target.debug_symbols_dir();
    if !debug_dir.is_dir() {
        return Err(StageError::missing_directory("Debug symbol directory", debug_dir));
    }

    info!(org = %sentry.org, project = %sentry.project, "uploading debug symbols");
    runner.simple(
        &upload_command(target, sentry, auth_token),
        Some(target.root.as_path()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agbuild_core::{BuildIdentity, BuildLayout};
    use agbuild_process::RecordingRunner;
    use std::path::Path;
    use tempfile::TempDir;

    fn target(root: &Path) -> Target {
        let identity = BuildIdentity::from_token("macos-10.8-x86_64").unwrap();
        let layout = BuildLayout::new(&identity, None);
        Target::new(root, identity, layout)
    }

    #[test]
    fn test_upload_command() {
        let sentry = SentryConfig::default();
        assert_eq!(
            upload_command(&target(Path::new(".")), &sentry, "tok"),
            "sentry-cli --auth-token tok upload-dif -o e47 -p audiogridder build-macos-10.8-x86_64/debug-symbols"
        );
    }

    #[test]
    fn test_upload_runs_in_root() {
        let temp = TempDir::new().unwrap();
        let target = target(temp.path());
        std::fs::create_dir_all(target.debug_symbols_dir()).unwrap();

        let runner = RecordingRunner::new();
        upload_symbols(&target, &SentryConfig::default(), "tok", &runner).unwrap();
        assert_eq!(runner.commands().len(), 1);
    }

    #[test]
    fn test_upload_requires_symbols() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let err = upload_symbols(&target(temp.path()), &SentryConfig::default(), "tok", &runner)
            .unwrap_err();
        assert!(matches!(err, StageError::MissingDirectory { .. }));
        assert!(runner.calls().is_empty());
    }
}
