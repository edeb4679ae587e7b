//! CLI commands

mod archive;
mod build;
mod configure;
mod package;
mod package_many;
mod upload_symbols;

pub use archive::ArchiveCommand;
pub use build::BuildCommand;
pub use configure::ConfigureCommand;
pub use package::PackageCommand;
pub use package_many::PackageManyCommand;
pub use test::TestCommand;
pub use upload_symbols::UploadSymbolsCommand;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use agbuild_core::config::load_config_or_default;
use agbuild_core::{version, BuildIdentity, BuildLayout, Config, Platform, UnameProbe};
use agbuild_process::Runner;
use agbuild_stages::Target;

/// Flags selecting the build every command works on
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// CMake build type
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "RelWithDebInfo")]
    pub build_type: String,

    /// Build directory (default: build-<platform>-[<macos-target>-]<arch>)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Target platform (default: host)
    #[arg(long, value_parser = ["macos", "linux", "windows"])]
    pub platform: Option<String>,

    /// Architecture (default: host)
    #[arg(long)]
    pub arch: Option<String>,

    /// macOS deployment target
    #[arg(long)]
    pub macos_target: Option<String>,
}

impl TargetArgs {
    /// Resolve the identity from the flags and the host
    pub fn identity(&self) -> anyhow::Result<BuildIdentity> {
        let platform = self
            .platform
            .as_deref()
            .map(str::parse::<Platform>)
            .transpose()?;
        let identity = BuildIdentity::resolve(
            platform,
            self.arch.as_deref(),
            self.macos_target.as_deref(),
            &UnameProbe,
        )?;
        Ok(identity)
    }

    /// The build these flags select, rooted at `root`
    pub fn target(&self, root: &Path) -> anyhow::Result<Target> {
        let identity = self.identity()?;
        let layout = BuildLayout::new(&identity, self.build_dir.as_deref());
        debug!(identity = %identity, build_dir = %layout.build_dir.display(), "target resolved");
        Ok(Target::new(root, identity, layout))
    }
}

/// The project root, i.e. the working directory after `-C`
pub fn project_root() -> anyhow::Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

/// Load `agbuild.toml`/`agbuild.yaml` if present, defaults otherwise
pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    let (config, path) = load_config_or_default(root)?;
    match path {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("no configuration file, using defaults"),
    }
    Ok(config)
}

/// The product version, generated on macOS hosts if the version file is
/// missing
pub fn resolve_version(root: &Path, runner: &dyn Runner) -> anyhow::Result<String> {
    let version = version::resolve_version(root, Platform::current(), |script| {
        runner.simple(script, Some(root))
    })?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(platform: &str, arch: &str, macos_target: Option<&str>) -> TargetArgs {
        TargetArgs {
            build_type: "RelWithDebInfo".to_string(),
            build_dir: None,
            platform: Some(platform.to_string()),
            arch: Some(arch.to_string()),
            macos_target: macos_target.map(str::to_string),
        }
    }

    #[test]
    fn test_default_build_dir() {
        let target = args("linux", "x86_64", None).target(Path::new("/src")).unwrap();
        assert_eq!(target.build_dir(), Path::new("/src/build-linux-x86_64"));
        assert_eq!(
            target.debug_symbols_dir(),
            Path::new("/src/build-linux-x86_64/debug-symbols")
        );
    }

    #[test]
    fn test_arm64_forces_deployment_target() {
        let target = args("macos", "arm64", Some("10.8"))
            .target(Path::new("/src"))
            .unwrap();
        assert_eq!(target.identity.macos_target.as_deref(), Some("11.1"));
        assert_eq!(target.layout.build_dir, Path::new("build-macos-11.1-arm64"));
    }

    #[test]
    fn test_build_dir_override() {
        let mut args = args("windows", "x86_64", None);
        args.build_dir = Some(PathBuf::from("out"));
        let target = args.target(Path::new("/src")).unwrap();
        assert_eq!(target.build_dir(), Path::new("/src/out"));
    }
}
