//! Product version lookup

use std::path::Path;

use tracing::info;

use crate::platform::Platform;

/// Version file, relative to the repository root
pub const VERSION_FILE: &str = "package/VERSION";

/// Script that writes [`VERSION_FILE`]; only runs on macOS hosts
pub const SET_VERSION_SCRIPT: &str = "package/setversion.sh";

/// Placeholder used when no version can be determined
pub const DEV_BUILD_VERSION: &str = "dev-build";

/// Read the first line of the version file, if present
pub fn read_version_file(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join(VERSION_FILE)).ok()?;
    Some(content.lines().next().unwrap_or_default().trim_end().to_string())
}

/// Resolve the product version.
///
/// Reads [`VERSION_FILE`]. If it is missing and the host is macOS, `generate`
/// is asked to run [`SET_VERSION_SCRIPT`] and the file is read again. Any
/// other host gets [`DEV_BUILD_VERSION`].
pub fn resolve_version<E, F>(root: &Path, host: Option<Platform>, generate: F) -> Result<String, E>
where
    F: FnOnce(&str) -> Result<(), E>,
{
    if let Some(version) = read_version_file(root) {
        return Ok(version);
    }

    if host != Some(Platform::MacOs) {
        info!("can only set version from macos, using {}", DEV_BUILD_VERSION);
        return Ok(DEV_BUILD_VERSION.to_string());
    }

    generate(SET_VERSION_SCRIPT)?;
    Ok(read_version_file(root).unwrap_or_else(|| DEV_BUILD_VERSION.to_string()))
}
