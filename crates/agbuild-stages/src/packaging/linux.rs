//! Linux archive with VST and VST3 plugin bundles

use agbuild_core::Platform;
use agbuild_process::Runner;
use tracing::{debug, warn};

use super::{PackageContext, PackagingStrategy};
use crate::artifacts::{Artifact, ArtifactKind};
use crate::error::Result;
use crate::fsutil;
use crate::symbols::PLUGIN_NAMES;

/// Staging tree, relative to the project root
pub const STAGING_DIR: &str = "package/build/linux";

/// Platform directory inside a VST3 bundle
const VST3_ARCH_DIR: &str = "x86_64-linux";

/// Restructures `lib/` and `bin/` into the plugin bundle layout and zips it
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxPackaging;

impl PackagingStrategy for LinuxPackaging {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn assemble(&self, ctx: &PackageContext, runner: &dyn Runner) -> Result<Vec<Artifact>> {
        let staging = ctx.target.path(STAGING_DIR);
        let vst = staging.join("vst");
        let vst3 = staging.join("vst3");
        let bin = staging.join("bin");

        std::fs::create_dir_all(&vst)?;
        for name in PLUGIN_NAMES {
            std::fs::create_dir_all(vst3_contents(&vst3, name))?;
        }
        std::fs::create_dir_all(&bin)?;

        let lib_dir = ctx.target.lib_dir();

        runner.line("copying vst plugins...");
        for src in fsutil::glob_in(&lib_dir, "lib*.so") {
            let Some(name) = file_name(&src) else { continue };
            let stripped = name.strip_prefix("lib").unwrap_or(name);
            fsutil::copy_file(&src, &vst.join(stripped))?;
        }

        runner.line("copying vst3 plugins...");
        for src in fsutil::glob_in(&lib_dir, "AudioGridder*.so") {
            let Some(name) = file_name(&src) else { continue };
            let stem = name.trim_end_matches(".so");
            let bundle = vst3_contents(&vst3, stem);
            std::fs::create_dir_all(&bundle)?;
            fsutil::copy_file(&src, &bundle.join(name))?;
        }

        runner.line("copying binaries...");
        let bin_dir = ctx.target.bin_dir();
        for binary in ["AudioGridderPluginTray", "crashpad_handler"] {
            fsutil::copy_into(&bin_dir.join(binary), &bin)?;
        }

        let archive_name = format!("AudioGridder_{}-Linux.zip", ctx.version);
        runner.simple(
            &format!("zip -r ../{} vst vst3 bin", archive_name),
            Some(staging.as_path()),
        )?;
        runner.simple(
            &format!("zip -j ../{} ../../install-trayapp-linux.sh", archive_name),
            Some(staging.as_path()),
        )?;

        if let Err(e) = std::fs::remove_dir_all(&staging) {
            warn!(dir = %staging.display(), error = %e, "failed to remove staging tree");
        } else {
            debug!(dir = %staging.display(), "removed staging tree");
        }

        Ok(vec![Artifact::new(
            ctx.output_dir().join(archive_name),
            ArtifactKind::Archive,
        )])
    }
}

fn vst3_contents(vst3: &std::path::Path, name: &str) -> std::path::PathBuf {
    vst3.join(format!("{}.vst3", name))
        .join("Contents")
        .join(VST3_ARCH_DIR)
}

fn file_name(path: &std::path::Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
