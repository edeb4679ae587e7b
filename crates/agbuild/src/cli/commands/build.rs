//! Build command - compile a configured build tree

use clap::Args;
use tracing::info;

use agbuild_process::HostRunner;
use agbuild_stages::{build, BuildContext};

use super::{project_root, TargetArgs};
use crate::cli::{output, Cli};

/// Build the configured tree
#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Extract debug symbols after the build
    #[arg(long)]
    pub create_debug_symbols: bool,

    /// Build only this CMake target
    #[arg(long = "target", value_name = "TARGET")]
    pub build_target: Option<String>,

    /// Clean before building
    #[arg(long)]
    pub clean: bool,

    /// Let CMake pick the number of parallel jobs
    #[arg(long)]
    pub parallel: bool,

    /// Number of parallel jobs
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Verbose build tool output
    #[arg(long)]
    pub verbose_build: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let target = self.target.target(&root)?;
        info!(identity = %target.identity, jobs = self.jobs, parallel = self.parallel, "executing build command");

        let ctx = BuildContext {
            target,
            build_type: self.target.build_type.clone(),
            build_target: self.build_target.clone(),
            clean: self.clean,
            parallel: self.parallel,
            jobs: self.jobs,
            verbose: self.verbose_build,
            debug_symbols: self.create_debug_symbols,
        };

        let runner = HostRunner::new();
        build(&ctx, &runner)?;

        if !cli.quiet {
            output::success(&format!("Built {}", ctx.target.identity));
            if ctx.debug_symbols {
                println!(
                    "{}",
                    output::key_value(
                        "Debug symbols",
                        &ctx.target.debug_symbols_dir().display().to_string()
                    )
                );
            }
        }
        Ok(())
    }
}
