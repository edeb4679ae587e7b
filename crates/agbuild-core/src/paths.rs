//! Directory layout derived from a build identity

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::platform::BuildIdentity;

/// Environment variable consulted when no dependency root is passed
pub const DEPS_ROOT_ENV: &str = "AG_DEPS_ROOT";

/// Environment variable consulted when no SDK root is passed
pub const SDKS_ROOT_ENV: &str = "AG_SDKS_ROOT";

/// Name of the debug symbol directory inside the build directory
pub const DEBUG_SYMBOLS_DIR: &str = "debug-symbols";

/// Build and debug-symbol directories for one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub build_dir: PathBuf,
    pub debug_symbols_dir: PathBuf,
}

impl BuildLayout {
    /// Layout for an identity, honoring an explicit build directory
    pub fn new(identity: &BuildIdentity, build_dir_override: Option<&Path>) -> Self {
        let build_dir = build_dir_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_build_dir(identity));
        Self::from_build_dir(build_dir)
    }

    pub fn from_build_dir(build_dir: impl Into<PathBuf>) -> Self {
        let build_dir = build_dir.into();
        let debug_symbols_dir = build_dir.join(DEBUG_SYMBOLS_DIR);
        Self {
            build_dir,
            debug_symbols_dir,
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.build_dir.join("bin")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.build_dir.join("lib")
    }
}

/// `build-<platform_arch>`
pub fn default_build_dir(identity: &BuildIdentity) -> PathBuf {
    PathBuf::from(format!("build-{}", identity.platform_arch()))
}

/// Make `path` absolute against `base` and use forward slashes
pub fn normalize_dir(path: &Path, base: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    absolute.to_string_lossy().replace('\\', "/")
}

/// Resolve the per-identity dependency directory.
///
/// The root is taken from the override, then the environment, then
/// `default_root`. A missing root is fatal: nothing can be configured
/// without it.
pub fn resolve_deps_dir(
    identity: &BuildIdentity,
    root_override: Option<&str>,
    env_fallback: Option<String>,
    default_root: &str,
    base: &Path,
) -> Result<String> {
    let root = root_override
        .map(str::to_string)
        .or(env_fallback)
        .unwrap_or_else(|| default_root.to_string());

    let root_path = Path::new(&root);
    let absolute = if root_path.is_absolute() {
        root_path.to_path_buf()
    } else {
        base.join(root_path)
    };
    if !absolute.is_dir() {
        return Err(ConfigError::missing_directory("Dependency root", absolute).into());
    }

    let deps = format!(
        "{}/{}",
        normalize_dir(root_path, base),
        identity.platform_arch()
    );
    debug!(deps = %deps, "resolved dependency directory");
    Ok(deps)
}

/// Resolve the SDK root. Absence is not an error: the optional plugin formats
/// that need it are disabled instead.
pub fn resolve_sdks_dir(
    root_override: Option<&str>,
    env_fallback: Option<String>,
    default_root: &str,
    base: &Path,
) -> Option<String> {
    let root = root_override
        .map(str::to_string)
        .or(env_fallback)
        .unwrap_or_else(|| default_root.to_string());

    let root_path = Path::new(&root);
    let absolute = if root_path.is_absolute() {
        root_path.to_path_buf()
    } else {
        base.join(root_path)
    };
    if !absolute.is_dir() {
        info!(path = %absolute.display(), "no SDK directory, VST2 and AAX plugins disabled");
        return None;
    }

    Some(normalize_dir(root_path, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgbuildError;
    use crate::platform::Platform;
    use tempfile::TempDir;

    fn linux() -> BuildIdentity {
        BuildIdentity::new(Platform::Linux, "x86_64", None)
    }

    #[test]
    fn test_default_layout() {
        let mac = BuildIdentity::new(Platform::MacOs, "arm64", None);
        let layout = BuildLayout::new(&mac, None);
        assert_eq!(layout.build_dir, PathBuf::from("build-macos-11.1-arm64"));
        assert_eq!(
            layout.debug_symbols_dir,
            PathBuf::from("build-macos-11.1-arm64").join("debug-symbols")
        );
        assert_eq!(layout.bin_dir(), PathBuf::from("build-macos-11.1-arm64").join("bin"));
    }

    #[test]
    fn test_build_dir_override_keeps_debug_subpath() {
        let layout = BuildLayout::new(&linux(), Some(Path::new("out")));
        assert_eq!(layout.build_dir, PathBuf::from("out"));
        assert_eq!(layout.debug_symbols_dir, PathBuf::from("out").join("debug-symbols"));
    }

    #[test]
    fn test_deps_dir_resolution_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("flag")).unwrap();
        std::fs::create_dir(temp.path().join("env")).unwrap();

        let deps = resolve_deps_dir(
            &linux(),
            Some("flag"),
            Some("env".to_string()),
            "default",
            temp.path(),
        )
        .unwrap();
        assert!(deps.ends_with("/flag/linux-x86_64"));

        let deps =
            resolve_deps_dir(&linux(), None, Some("env".to_string()), "default", temp.path())
                .unwrap();
        assert!(deps.ends_with("/env/linux-x86_64"));
        assert!(!deps.contains('\\'));
    }

    #[test]
    fn test_missing_deps_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = resolve_deps_dir(&linux(), None, None, "nope", temp.path()).unwrap_err();
        assert!(matches!(
            err,
            AgbuildError::Config(ConfigError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_missing_sdks_dir_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_sdks_dir(None, None, "sdks", temp.path()), None);

        std::fs::create_dir(temp.path().join("sdks")).unwrap();
        let sdks = resolve_sdks_dir(None, None, "sdks", temp.path()).unwrap();
        assert!(sdks.ends_with("/sdks"));
    }
}
