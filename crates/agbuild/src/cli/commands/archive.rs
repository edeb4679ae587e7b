//! Archive command - keep debug symbols with the release

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use agbuild_process::HostRunner;
use agbuild_stages::archive_debug_symbols;

use super::{project_root, resolve_version, TargetArgs};
use crate::cli::{output, Cli};

/// Copy the debug symbols to <dest>/Builds/<version>
#[derive(Debug, Args)]
pub struct ArchiveCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Archive root
    #[arg(long)]
    pub dest: PathBuf,
}

impl ArchiveCommand {
    /// Execute the archive command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let target = self.target.target(&root)?;
        let runner = HostRunner::new();
        let version = resolve_version(&root, &runner)?;
        info!(identity = %target.identity, version = %version, dest = %self.dest.display(), "executing archive command");

        if !cli.quiet {
            output::info(&format!(
                "copying {} -> {} ...",
                target.debug_symbols_dir().display(),
                self.dest.join("Builds").join(&version).display()
            ));
        }
        let archived = archive_debug_symbols(&target, &version, &self.dest)?;

        if !cli.quiet {
            output::success(&format!(
                "Archived debug symbols to {}",
                output::path_style().apply_to(archived.display())
            ));
        }
        Ok(())
    }
}
