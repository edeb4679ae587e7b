//! Configure command - generate the CMake build tree

use clap::Args;
use tracing::info;

use agbuild_core::paths::{self, normalize_dir, DEPS_ROOT_ENV, SDKS_ROOT_ENV};
use agbuild_core::Platform;
use agbuild_process::HostRunner;
use agbuild_signing::MacOSSigner;
use agbuild_stages::{configure, ConfigureContext, SigningContext, ToolchainSelector};

use super::{load_config, project_root, TargetArgs};
use crate::cli::{output, Cli};

/// Generate the build tree for a platform identity
#[derive(Debug, Args)]
pub struct ConfigureCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Toolchain to select with xcode-select instead of the one required by
    /// the deployment target
    #[arg(long)]
    pub macos_toolchain: Option<String>,

    /// Dependencies root (default: $AG_DEPS_ROOT, then config)
    #[arg(long)]
    pub deps_root: Option<String>,

    /// Non-public SDKs root (default: $AG_SDKS_ROOT, then config)
    #[arg(long)]
    pub sdks_root: Option<String>,

    /// Enable crash reporting with this Sentry DSN
    #[arg(long)]
    pub sentry_dsn: Option<String>,

    /// Disable code signing
    #[arg(long)]
    pub disable_signing: bool,

    /// Disable copying plugins into the system folders after Debug builds
    #[arg(long)]
    pub disable_copy_step: bool,

    /// Enable the test targets
    #[arg(long)]
    pub with_tests: bool,

    /// Test data directory (default from config: Tests/Data)
    #[arg(long)]
    pub tests_data: Option<String>,

    /// Build with the address sanitizer
    #[arg(long)]
    pub sanitizer: bool,

    /// Write the parameters to .vscode/settings.json instead of running CMake
    #[arg(long)]
    pub editor_settings: bool,

    /// Unlock the signing keychain first (macOS only)
    #[arg(long, env = "AG_KEYCHAIN_PASSWORD", hide_env_values = true)]
    pub keychain_password: Option<String>,
}

impl ConfigureCommand {
    /// Execute the configure command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let root = project_root()?;
        let config = load_config(&root)?;
        let target = self.target.target(&root)?;
        let identity = target.identity.clone();
        info!(identity = %identity, build_type = %self.target.build_type, "executing configure command");

        let deps_dir = paths::resolve_deps_dir(
            &identity,
            self.deps_root.as_deref(),
            std::env::var(DEPS_ROOT_ENV).ok(),
            &config.paths.deps_root,
            &root,
        )?;
        let sdks_dir = paths::resolve_sdks_dir(
            self.sdks_root.as_deref(),
            std::env::var(SDKS_ROOT_ENV).ok(),
            &config.paths.sdks_root,
            &root,
        );

        let host = Platform::current();
        let signing = (!self.disable_signing).then(|| SigningContext {
            signer: MacOSSigner::new(&config.signing.identity, &config.signing.keychain),
            keychain_password: self
                .keychain_password
                .clone()
                .filter(|_| host == Some(Platform::MacOs)),
        });

        let tests_data = self.with_tests.then(|| {
            let dir = self
                .tests_data
                .clone()
                .unwrap_or_else(|| config.tests.data_dir.clone());
            normalize_dir(std::path::Path::new(&dir), &root)
        });

        let mut ctx = ConfigureContext {
            target,
            build_type: self.target.build_type.clone(),
            deps_dir,
            sdks_dir,
            sysroot: None,
            sentry_dsn: self.sentry_dsn.clone(),
            signing,
            copy_step: !self.disable_copy_step,
            tests_data,
            sanitizer: self.sanitizer,
            editor_settings: self.editor_settings,
        };

        let runner = HostRunner::new();

        let macos_target = identity
            .macos_target
            .as_deref()
            .filter(|_| host == Some(Platform::MacOs));
        match macos_target {
            Some(macos_target) => {
                let guard =
                    ToolchainSelector::bind(&runner, macos_target, self.macos_toolchain.as_deref())?;
                ctx.sysroot = Some(guard.sdk_root().to_path_buf());
                let result = configure(&ctx, &runner);
                let restored = guard.restore();
                result?;
                restored?;
            }
            None => configure(&ctx, &runner)?,
        }

        if !cli.quiet {
            output::success(&format!("Configured {}", identity));
            println!("{}", output::key_value("Build directory", &ctx.target.build_dir_arg()));
            println!("{}", output::key_value("Dependencies", &ctx.deps_dir));
            if ctx.sdks_dir.is_none() {
                output::warning("No SDKs found, VST2 and AAX plugins disabled");
            }
        }
        Ok(())
    }
}
