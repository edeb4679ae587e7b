//! Configure stage: generate the CMake build tree

use std::fmt;

use agbuild_core::Platform;
use agbuild_process::{quote_arg, Runner};
use agbuild_signing::SignOptions;
use tracing::{debug, info};

use crate::context::ConfigureContext;
use crate::error::{Result, StageError};
use crate::fsutil;
use crate::settings;

/// Crash handler shipped with the dependencies
pub const CRASH_HANDLER: &str = "crashpad_handler";

/// One CMake configure parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmakeParam {
    /// `-B <dir>`
    BuildDir(String),
    /// `-D<name>=<value>`
    Define(String, String),
    /// Anything else, passed through verbatim
    Arg(String),
}

impl CmakeParam {
    fn define(name: &str, value: impl Into<String>) -> Self {
        Self::Define(name.to_string(), value.into())
    }

    fn on(name: &str) -> Self {
        Self::define(name, "ON")
    }

    fn off(name: &str) -> Self {
        Self::define(name, "OFF")
    }

    /// Arguments as passed to cmake
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::BuildDir(dir) => vec!["-B".to_string(), dir.clone()],
            Self::Define(name, value) => vec![format!("-D{}={}", name, value)],
            Self::Arg(arg) => vec![arg.clone()],
        }
    }
}

impl fmt::Display for CmakeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.args().iter().map(|a| quote_arg(a)).collect();
        f.write_str(&quoted.join(" "))
    }
}

/// Assemble the configure parameters
pub fn cmake_params(ctx: &ConfigureContext) -> Vec<CmakeParam> {
    let identity = &ctx.target.identity;
    let platform = identity.platform;
    let mut params = vec![
        CmakeParam::BuildDir(ctx.target.build_dir_arg()),
        CmakeParam::define("AG_DEPS_ROOT", &ctx.deps_dir),
    ];

    if let Some(sdks) = &ctx.sdks_dir {
        params.push(CmakeParam::define("AG_SDKS_ROOT", sdks));
        params.push(CmakeParam::on("AG_VST2_PLUGIN_ENABLED"));
        if matches!(platform, Platform::MacOs | Platform::Windows) {
            params.push(CmakeParam::on("AG_AAX_PLUGIN_ENABLED"));
        }
    }

    match platform {
        Platform::MacOs => {
            params.push(CmakeParam::define("CMAKE_BUILD_TYPE", &ctx.build_type));
            params.push(CmakeParam::define("CMAKE_OSX_ARCHITECTURES", &identity.arch));
            if let Some(target) = &identity.macos_target {
                params.push(CmakeParam::define("AG_MACOS_TARGET", target));
            }
            if let Some(sysroot) = ctx.sysroot.as_ref().filter(|p| p.is_dir()) {
                params.push(CmakeParam::define(
                    "CMAKE_OSX_SYSROOT",
                    sysroot.to_string_lossy(),
                ));
            }
        }
        Platform::Linux => {
            params.push(CmakeParam::define("CMAKE_BUILD_TYPE", &ctx.build_type));
        }
        Platform::Windows => {
            params.push(CmakeParam::Arg("-A".to_string()));
            params.push(CmakeParam::Arg("x64".to_string()));
        }
    }

    if let Some(dsn) = &ctx.sentry_dsn {
        params.push(CmakeParam::on("AG_ENABLE_SENTRY"));
        params.push(CmakeParam::define("AG_SENTRY_DSN", dsn));
    }
    if ctx.signing.is_none() {
        params.push(CmakeParam::off("AG_ENABLE_CODE_SIGNING"));
    }
    if !ctx.copy_step {
        params.push(CmakeParam::off("AG_ENABLE_DEBUG_COPY_STEP"));
    }
    if let Some(data) = &ctx.tests_data {
        params.push(CmakeParam::on("AG_WITH_TESTS"));
        params.push(CmakeParam::define("AG_TESTS_DATA", data));
    }
    if ctx.sanitizer {
        params.push(CmakeParam::on("AG_ENABLE_ASAN"));
    }

    params
}

/// `cmake <params>`
pub fn cmake_command(params: &[CmakeParam]) -> String {
    std::iter::once("cmake".to_string())
        .chain(params.iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the configure stage
pub fn configure(ctx: &ConfigureContext, runner: &dyn Runner) -> Result<()> {
    let target = &ctx.target;
    let build_dir = target.build_dir();
    info!(build_dir = %build_dir.display(), identity = %target.identity, "configuring");

    let handler_src = crash_handler_source(ctx)?;
    fsutil::recreate_dir(&build_dir)?;
    std::fs::create_dir_all(target.bin_dir())?;

    let params = cmake_params(ctx);
    debug!(params = ?params, "cmake parameters");

    let handler = fsutil::copy_into(&handler_src, &target.bin_dir())?;
    debug!(dst = %handler.display(), "copied crash handler");
    if let (Platform::MacOs, Some(signing)) = (target.identity.platform, &ctx.signing) {
        if let Some(password) = &signing.keychain_password {
            signing.signer.unlock_keychain(runner, password)?;
        }
        signing.signer.sign(runner, &handler, &SignOptions::default())?;
    }

    if ctx.editor_settings {
        let path = target.path(settings::SETTINGS_FILE);
        settings::write_cmake_settings(&path, &params)?;
        runner.line(&format!("Updated {}", path.display()));
        return Ok(());
    }

    runner.simple(&cmake_command(&params), Some(target.root.as_path()))?;
    Ok(())
}

/// The crash handler shipped with the dependencies. Every build bundles it,
/// so a missing handler stops the configure before the build tree is wiped.
fn crash_handler_source(ctx: &ConfigureContext) -> Result<std::path::PathBuf> {
    let name = format!("{}{}", CRASH_HANDLER, ctx.target.identity.platform.exe_suffix());
    let src = std::path::Path::new(&ctx.deps_dir).join("bin").join(name);
    if !src.is_file() {
        return Err(StageError::MissingFile(src));
    }
    Ok(src)
}
