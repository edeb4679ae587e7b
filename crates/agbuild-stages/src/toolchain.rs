//! macOS command line toolchain selection
//!
//! Older deployment targets need an older set of command line tools. The
//! selector switches the host's active toolchain with `xcode-select` for the
//! duration of a configure run and the returned [`ToolchainGuard`] switches
//! it back when dropped, whether the run succeeded or not.

use std::path::{Path, PathBuf};

use agbuild_process::{quote_arg, Runner};
use tracing::{error, info, warn};

use crate::error::Result;

/// Toolchain able to target 10.7 and 10.8
pub const LEGACY_TOOLCHAIN: &str = "/Library/Developer/10/CommandLineTools";

/// Toolchain for 11.x targets
pub const CURRENT_TOOLCHAIN: &str = "/Library/Developer/CommandLineTools";

/// SDK location inside a toolchain
const SDK_SUBPATH: &str = "SDKs/MacOSX.sdk";

/// Toolchain required for a deployment target, if any
pub fn required_toolchain(macos_target: &str) -> Option<&'static str> {
    match macos_target {
        "10.7" | "10.8" => Some(LEGACY_TOOLCHAIN),
        "11.1" => Some(CURRENT_TOOLCHAIN),
        _ => None,
    }
}

/// Binds the host toolchain for a deployment target
pub struct ToolchainSelector;

impl ToolchainSelector {
    /// Select the toolchain for `macos_target`, or `toolchain_override` if
    /// given.
    ///
    /// The switch only happens if the required toolchain differs from the
    /// active one and exists on disk; otherwise the active one is kept.
    pub fn bind<'a>(
        runner: &'a dyn Runner,
        macos_target: &str,
        toolchain_override: Option<&str>,
    ) -> Result<ToolchainGuard<'a>> {
        Self::bind_with(runner, macos_target, toolchain_override, |p| p.is_dir())
    }

    pub(crate) fn bind_with<'a>(
        runner: &'a dyn Runner,
        macos_target: &str,
        toolchain_override: Option<&str>,
        exists: impl Fn(&Path) -> bool,
    ) -> Result<ToolchainGuard<'a>> {
        let previous = runner.capture("xcode-select", &["-p"])?;
        let required = toolchain_override
            .map(str::to_string)
            .or_else(|| required_toolchain(macos_target).map(str::to_string));

        let active = match required {
            Some(required) if required != previous && exists(Path::new(&required)) => {
                runner.line("required toolchain not selected, trying xcode-select");
                runner.simple(&format!("sudo xcode-select -s {}", quote_arg(&required)), None)?;
                required
            }
            Some(required) if required != previous => {
                warn!(
                    required = %required,
                    active = %previous,
                    "required toolchain not installed, keeping active toolchain"
                );
                previous.clone()
            }
            _ => previous.clone(),
        };

        runner.line(&format!("Using toolchain: {}", active));
        info!(active = %active, previous = %previous, macos_target, "toolchain bound");

        let sdk_root = Path::new(&active).join(SDK_SUBPATH);
        Ok(ToolchainGuard {
            runner,
            previous,
            active,
            sdk_root,
            restored: false,
        })
    }
}

/// The selected toolchain. Restores the previous one when dropped.
pub struct ToolchainGuard<'a> {
    runner: &'a dyn Runner,
    previous: String,
    active: String,
    sdk_root: PathBuf,
    restored: bool,
}

impl<'a> ToolchainGuard<'a> {
    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// `<active>/SDKs/MacOSX.sdk`, which may not exist
    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    /// Whether the guard switched the toolchain
    pub fn switched(&self) -> bool {
        self.active != self.previous
    }

    /// Restore the previous toolchain now and report failure
    pub fn restore(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.restored || !self.switched() {
            self.restored = true;
            return Ok(());
        }
        self.restored = true;
        info!(toolchain = %self.previous, "restoring toolchain");
        self.runner.simple(
            &format!("sudo xcode-select -s {}", quote_arg(&self.previous)),
            None,
        )?;
        Ok(())
    }
}

impl Drop for ToolchainGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!(toolchain = %self.previous, error = %e, "failed to restore toolchain");
        }
    }
}
