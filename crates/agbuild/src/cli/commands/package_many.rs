//! Package-many command - fan-out packaging over several identities

use clap::Args;
use tracing::info;

use agbuild_process::HostRunner;
use agbuild_stages::{package_many, parse_platform_list, FanOutOptions};

use super::{load_config, project_root, resolve_version};
use crate::cli::{output, Cli};

/// Package a list of platform identities
#[derive(Debug, Args)]
pub struct PackageManyCommand {
    /// Comma separated identities, e.g. macos-10.8-x86_64,macos-11.1-arm64
    #[arg(long)]
    pub platforms: String,

    /// Also collect all macOS installers and build trees into two archives
    #[arg(long)]
    pub create_macos_archives: bool,
}

impl PackageManyCommand {
    /// Execute the package-many command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let config = load_config(&root)?;
        let identities = parse_platform_list(&self.platforms)?;
        if identities.is_empty() {
            anyhow::bail!("no platforms given");
        }

        let runner = HostRunner::new();
        let version = resolve_version(&root, &runner)?;
        info!(count = identities.len(), version = %version, "executing package-many command");

        let options = FanOutOptions {
            create_macos_archives: self.create_macos_archives,
        };
        let artifacts = package_many(
            &root,
            &identities,
            &version,
            &config.packaging.iscc,
            &options,
            &runner,
        )?;

        if !cli.quiet {
            output::success(&format!(
                "Packaged {} identities, version {}",
                identities.len(),
                version
            ));
            output::artifacts(&artifacts);
        }
        Ok(())
    }
}
