//! macOS installer packages built with Packages

use agbuild_core::{BuildIdentity, Platform};
use agbuild_process::Runner;
use tracing::debug;

use super::{PackageContext, PackagingStrategy};
use crate::artifacts::{Artifact, ArtifactKind};
use crate::error::{Result, StageError};

/// Installer components, each with its own `.pkgproj`
pub const COMPONENTS: [&str; 2] = ["AudioGridderServer", "AudioGridderPlugin"];

/// Merges per-architecture binaries before packaging universal builds
pub const UNIVERSAL_SCRIPT: &str = "package/createUniversalBinaries.sh";

/// Builds `.pkg` installers with `packagesbuild`
#[derive(Debug, Default, Clone, Copy)]
pub struct MacOsPackaging;

fn is_legacy(identity: &BuildIdentity) -> bool {
    identity.macos_target.as_deref() == Some("10.7")
}

/// `package/<component>-[10.7-]<arch>.pkgproj`
pub fn project_path(component: &str, identity: &BuildIdentity) -> String {
    let legacy = if is_legacy(identity) { "10.7-" } else { "" };
    format!("package/{}-{}{}.pkgproj", component, legacy, identity.arch)
}

/// `package/build/<component>_<version>_macOS[-10.7]-<arch>.pkg`
pub fn installer_path(component: &str, version: &str, identity: &BuildIdentity) -> String {
    let legacy = if is_legacy(identity) { "-10.7" } else { "" };
    format!(
        "package/build/{}_{}_macOS{}-{}.pkg",
        component, version, legacy, identity.arch
    )
}

impl PackagingStrategy for MacOsPackaging {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn assemble(&self, ctx: &PackageContext, runner: &dyn Runner) -> Result<Vec<Artifact>> {
        let target = &ctx.target;
        let identity = &target.identity;
        let root = Some(target.root.as_path());

        if identity.arch == "universal" {
            runner.simple(UNIVERSAL_SCRIPT, root)?;
        }

        for component in COMPONENTS {
            runner.simple(
                &format!(
                    "packagesbuild --package-version \"{}\" {}",
                    ctx.version,
                    project_path(component, identity)
                ),
                root,
            )?;
        }

        let mut artifacts = Vec::new();
        for component in COMPONENTS {
            let built = ctx.output_dir().join(format!("{}.pkg", component));
            let renamed = target.path(installer_path(component, &ctx.version, identity));
            if !built.is_file() {
                return Err(StageError::MissingFile(built));
            }
            std::fs::rename(&built, &renamed)?;
            debug!(from = %built.display(), to = %renamed.display(), "renamed installer");
            artifacts.push(Artifact::new(renamed, ArtifactKind::Pkg));
        }
        Ok(artifacts)
    }
}
