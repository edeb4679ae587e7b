//! Packaging several identities in one invocation

use std::path::Path;

use agbuild_core::paths::DEBUG_SYMBOLS_DIR;
use agbuild_core::{BuildIdentity, BuildLayout};
use agbuild_process::Runner;
use tracing::info;

use super::macos::{installer_path, COMPONENTS};
use super::{package, PackageContext, PACKAGE_BUILD_DIR};
use crate::artifacts::{Artifact, ArtifactKind};
use crate::context::Target;
use crate::error::Result;

/// Options for [`package_many`]
#[derive(Debug, Clone, Default)]
pub struct FanOutOptions {
    /// Collect all macOS installers and build trees into two archives
    pub create_macos_archives: bool,
}

/// Parse a comma separated list such as `macos-10.8-x86_64,macos-11.1-arm64`
pub fn parse_platform_list(list: &str) -> Result<Vec<BuildIdentity>> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| BuildIdentity::from_token(token).map_err(Into::into))
        .collect()
}

/// Package every identity in order.
///
/// Build directories are derived from each identity alone, overrides and the
/// host are not consulted.
pub fn package_many(
    root: &Path,
    identities: &[BuildIdentity],
    version: &str,
    iscc: &str,
    options: &FanOutOptions,
    runner: &dyn Runner,
) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();
    let mut mac_packages = Vec::new();
    let mut mac_build_dirs = Vec::new();

    for identity in identities {
        let layout = BuildLayout::new(identity, None);
        let ctx = PackageContext {
            target: Target::new(root, identity.clone(), layout),
            version: version.to_string(),
            iscc: iscc.to_string(),
        };
        runner.line(&format!("Packaging {} ...", identity));
        artifacts.extend(package(&ctx, runner)?);

        if options.create_macos_archives && identity.platform.is_macos() {
            for component in COMPONENTS {
                mac_packages.push(installer_path(component, version, identity));
            }
            mac_build_dirs.push(ctx.target.build_dir_arg());
        }
    }

    if options.create_macos_archives && !mac_packages.is_empty() {
        let installers = format!("{}/AudioGridder_{}-MacOS-Installers.zip", PACKAGE_BUILD_DIR, version);
        let trees = format!("{}/AudioGridder_{}-MacOS.zip", PACKAGE_BUILD_DIR, version);

        runner.simple(
            &format!("zip -j -9 {} {}", installers, mac_packages.join(" ")),
            Some(root),
        )?;
        runner.simple(&tree_archive_command(&trees, &mac_build_dirs), Some(root))?;

        artifacts.push(Artifact::new(root.join(installers), ArtifactKind::Archive));
        artifacts.push(Artifact::new(root.join(trees), ArtifactKind::Archive));
    }

    info!(count = identities.len(), artifacts = artifacts.len(), "fan-out packaging finished");
    Ok(artifacts)
}

/// Archive the `bin` and `lib` trees of several build directories, leaving
/// out static libraries and the debug symbol copies
fn tree_archive_command(archive: &str, build_dirs: &[String]) -> String {
    format!(
        "zip -r -9 {} {} -i \"*/bin/*\" \"*/lib/*\" -x \"*.a\" \"*/{}/*\"",
        archive,
        build_dirs.join(" "),
        DEBUG_SYMBOLS_DIR
    )
}
