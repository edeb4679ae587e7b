//! Windows installers built with Inno Setup, plus plain zip archives

use agbuild_core::Platform;
use agbuild_process::{quote_arg, Runner};
use tracing::info;

use super::{PackageContext, PackagingStrategy, PACKAGE_DIR};
use crate::artifacts::{Artifact, ArtifactKind};
use crate::error::Result;
use crate::fsutil;
use crate::zipfile::ZipBuilder;

/// Inno Setup scripts, relative to `package/`
pub const SCRIPTS: [&str; 2] = ["AudioGridderServer.iss", "AudioGridderPlugin.iss"];

/// Files from the build tree that go into the no-installer archive
const PORTABLE_PATTERNS: [&str; 4] = ["lib/*/*.dll", "lib/*/*.vst3", "lib/*/*.aaxplugin", "bin/*.exe"];

/// Builds installers with `ISCC.exe` and zips them
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsPackaging;

impl PackagingStrategy for WindowsPackaging {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn assemble(&self, ctx: &PackageContext, runner: &dyn Runner) -> Result<Vec<Artifact>> {
        let package_dir = ctx.target.path(PACKAGE_DIR);
        for script in SCRIPTS {
            runner.simple(
                &format!("{} /Obuild {}", quote_arg(&ctx.iscc), script),
                Some(package_dir.as_path()),
            )?;
        }

        let out = ctx.output_dir();
        let version = &ctx.version;

        runner.line("creating installers archive...");
        let installers = out.join(format!("AudioGridder_{}-Windows-Installers.zip", version));
        let mut zip = ZipBuilder::create(&installers)?;
        for component in ["AudioGridderServer", "AudioGridderPlugin"] {
            let name = format!("{}_{}.exe", component, version);
            zip.add_file(&out.join(&name), &name)?;
        }
        zip.finish()?;

        runner.line("creating no-installers archive...");
        let build_dir = ctx.target.build_dir();
        let portable = out.join(format!("AudioGridder_{}-Windows.zip", version));
        let mut zip = ZipBuilder::create(&portable)?;
        for pattern in PORTABLE_PATTERNS {
            for path in fsutil::glob_in(&build_dir, pattern) {
                let name = path
                    .strip_prefix(&build_dir)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                zip.add_path(&path, &name)?;
            }
        }
        zip.finish()?;

        info!(installers = %installers.display(), portable = %portable.display(), "windows archives created");
        Ok(vec![
            Artifact::new(installers, ArtifactKind::Archive),
            Artifact::new(portable, ArtifactKind::Archive),
        ])
    }
}
