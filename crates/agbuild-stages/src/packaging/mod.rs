//! Installer and archive packaging
//!
//! One [`PackagingStrategy`] per platform turns a finished build tree into
//! installers and zip archives under `package/build`. The fan-out in
//! [`fanout`] runs the same strategies for several identities in a row.

pub mod fanout;
pub mod linux;
pub mod macos;
pub mod windows;

use std::path::PathBuf;

use agbuild_core::Platform;
use agbuild_process::Runner;
use tracing::info;

use crate::artifacts::Artifact;
use crate::context::Target;
use crate::error::Result;

pub use fanout::{package_many, parse_platform_list, FanOutOptions};
pub use linux::LinuxPackaging;
pub use macos::MacOsPackaging;
pub use windows::WindowsPackaging;

/// Package sources and outputs, relative to the project root
pub const PACKAGE_DIR: &str = "package";
pub const PACKAGE_BUILD_DIR: &str = "package/build";

/// Everything a strategy needs to package one build
#[derive(Debug, Clone)]
pub struct PackageContext {
    pub target: Target,
    pub version: String,
    /// Inno Setup compiler, used on Windows only
    pub iscc: String,
}

impl PackageContext {
    /// `<root>/package/build`
    pub fn output_dir(&self) -> PathBuf {
        self.target.path(PACKAGE_BUILD_DIR)
    }
}

/// Turns a build tree into distributable files
pub trait PackagingStrategy {
    /// Platform this strategy packages for
    fn platform(&self) -> Platform;

    /// Produce the installers and archives for one build
    fn assemble(&self, ctx: &PackageContext, runner: &dyn Runner) -> Result<Vec<Artifact>>;
}

/// The strategy for a platform
pub fn strategy_for(platform: Platform) -> Box<dyn PackagingStrategy> {
    match platform {
        Platform::MacOs => Box::new(MacOsPackaging),
        Platform::Windows => Box::new(WindowsPackaging),
        Platform::Linux => Box::new(LinuxPackaging),
    }
}

/// Package a single build with the strategy for its platform
pub fn package(ctx: &PackageContext, runner: &dyn Runner) -> Result<Vec<Artifact>> {
    let strategy = strategy_for(ctx.target.identity.platform);
    info!(
        identity = %ctx.target.identity,
        version = %ctx.version,
        platform = %strategy.platform(),
        "packaging"
    );
    std::fs::create_dir_all(ctx.output_dir())?;
    strategy.assemble(ctx, runner)
}
