//! Upload-symbols command - send debug symbols to Sentry

use clap::Args;
use tracing::info;

use agbuild_process::HostRunner;
use agbuild_stages::upload_symbols;

use super::{load_config, project_root, TargetArgs};
use crate::cli::{output, Cli};

/// Upload the debug symbols of a build
#[derive(Debug, Args)]
pub struct UploadSymbolsCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Sentry auth token
    #[arg(long, env = "SENTRY_AUTH_TOKEN", hide_env_values = true)]
    pub sentry_auth_token: String,
}

impl UploadSymbolsCommand {
    /// Execute the upload-symbols command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let config = load_config(&root)?;
        let target = self.target.target(&root)?;
        info!(identity = %target.identity, "executing upload-symbols command");

        let runner = HostRunner::new();
        upload_symbols(&target, &config.sentry, &self.sentry_auth_token, &runner)?;

        if !cli.quiet {
            output::success(&format!(
                "Uploaded debug symbols to {}/{}",
                config.sentry.org, config.sentry.project
            ));
        }
        Ok(())
    }
}
