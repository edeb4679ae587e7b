//! Package command - installers and archives for one build

use clap::Args;
use tracing::info;

use agbuild_process::HostRunner;
use agbuild_stages::{package, PackageContext};

use super::{load_config, project_root, resolve_version, TargetArgs};
use crate::cli::{output, Cli};

/// Create installers and archives for one build
#[derive(Debug, Args)]
pub struct PackageCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl PackageCommand {
    /// Execute the package command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let config = load_config(&root)?;
        let target = self.target.target(&root)?;
        let runner = HostRunner::new();
        let version = resolve_version(&root, &runner)?;
        info!(identity = %target.identity, version = %version, "executing package command");

        let ctx = PackageContext {
            target,
            version,
            iscc: config.packaging.iscc.clone(),
        };
        let artifacts = package(&ctx, &runner)?;

        if !cli.quiet {
            output::success(&format!(
                "Packaged {} version {}",
                ctx.target.identity, ctx.version
            ));
            output::artifacts(&artifacts);
        }
        Ok(())
    }
}
