//! Platform, architecture and deployment-target resolution
//!
//! A [`BuildIdentity`] is computed once per invocation from command-line
//! overrides and host defaults and never changes afterwards. Everything that
//! derives paths (build directories, dependency directories, package names)
//! keys off [`BuildIdentity::platform_arch`].

use std::fmt;
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Deployment target used for macOS builds unless something forces a newer one
pub const BASELINE_MACOS_TARGET: &str = "10.8";

/// Deployment target required by arm64 builds
pub const ARM64_MACOS_TARGET: &str = "11.1";

/// Architecture assumed on Windows when none is given
pub const WINDOWS_DEFAULT_ARCH: &str = "x86_64";

/// Operating systems the product is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the host operating system. Unknown hosts yield `None`.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Lowercase identifier used in directory and token names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Suffix appended to executables built for this platform
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            _ => "",
        }
    }

    pub fn is_macos(&self) -> bool {
        matches!(self, Self::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            other => Err(ConfigError::invalid_token(
                other,
                "platform must be one of: macos, linux, windows",
            )),
        }
    }
}

/// Source of host facts that require asking the operating system
pub trait HostProbe {
    /// Native machine architecture as reported by the host, e.g. "arm64"
    fn machine_arch(&self) -> Option<String>;
}

/// Probe that asks `uname -m`
#[derive(Debug, Default, Clone, Copy)]
pub struct UnameProbe;

impl HostProbe for UnameProbe {
    fn machine_arch(&self) -> Option<String> {
        debug!("querying native architecture via uname -m");
        let output = Command::new("uname").arg("-m").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let arch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if arch.is_empty() {
            None
        } else {
            Some(arch)
        }
    }
}

/// Use the override if present, else the host platform
pub fn resolve_platform(override_platform: Option<Platform>) -> Option<Platform> {
    override_platform.or_else(Platform::current)
}

/// Resolve the CPU architecture for a platform.
///
/// macOS and Linux ask the host probe for the native architecture, Windows
/// defaults to `x86_64`.
pub fn resolve_architecture(
    platform: Platform,
    override_arch: Option<&str>,
    probe: &dyn HostProbe,
) -> String {
    if let Some(arch) = override_arch {
        return arch.to_string();
    }

    match platform {
        Platform::MacOs | Platform::Linux => probe
            .machine_arch()
            .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
        Platform::Windows => WINDOWS_DEFAULT_ARCH.to_string(),
    }
}

/// Resolve the macOS deployment target.
///
/// arm64 always builds against [`ARM64_MACOS_TARGET`]; an explicit differing
/// target is overridden with a warning. Otherwise the explicit target wins
/// over [`BASELINE_MACOS_TARGET`].
pub fn resolve_macos_target(arch: &str, explicit: Option<&str>) -> String {
    if arch == "arm64" {
        if let Some(requested) = explicit.filter(|t| *t != ARM64_MACOS_TARGET) {
            warn!(
                requested,
                forced = ARM64_MACOS_TARGET,
                "arm64 requires a newer deployment target, overriding"
            );
        }
        return ARM64_MACOS_TARGET.to_string();
    }

    explicit.unwrap_or(BASELINE_MACOS_TARGET).to_string()
}

/// The platform/architecture/target triple a build is produced for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIdentity {
    pub platform: Platform,
    pub arch: String,
    /// Deployment target, only present for macOS
    pub macos_target: Option<String>,
}

impl BuildIdentity {
    /// Build an identity, applying the deployment target rules for macOS
    pub fn new(platform: Platform, arch: impl Into<String>, macos_target: Option<&str>) -> Self {
        let arch = arch.into();
        let macos_target = platform
            .is_macos()
            .then(|| resolve_macos_target(&arch, macos_target));
        Self {
            platform,
            arch,
            macos_target,
        }
    }

    /// Resolve an identity from optional overrides and the host
    pub fn resolve(
        platform: Option<Platform>,
        arch: Option<&str>,
        macos_target: Option<&str>,
        probe: &dyn HostProbe,
    ) -> Result<Self, ConfigError> {
        let platform = resolve_platform(platform).ok_or(ConfigError::UnknownPlatform)?;
        let arch = resolve_architecture(platform, arch, probe);
        let identity = Self::new(platform, arch, macos_target);
        debug!(key = %identity.platform_arch(), "resolved build identity");
        Ok(identity)
    }

    /// Parse a fan-out token of the form `<os>[-<macos-target>]-<arch>`.
    ///
    /// The identity is derived from the token alone, the host is not
    /// consulted and the arm64 rule is not applied.
    pub fn from_token(token: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = token.trim().split('-').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::invalid_token(token, "empty component"));
        }

        match parts.as_slice() {
            [platform, arch] => {
                let platform: Platform = platform.parse()?;
                if platform.is_macos() {
                    return Err(ConfigError::invalid_token(
                        token,
                        "macos tokens need a deployment target: macos-<target>-<arch>",
                    ));
                }
                Ok(Self {
                    platform,
                    arch: arch.to_string(),
                    macos_target: None,
                })
            }
            [platform, target, arch] => {
                let platform: Platform = platform.parse()?;
                if !platform.is_macos() {
                    return Err(ConfigError::invalid_token(
                        token,
                        "only macos tokens carry a deployment target",
                    ));
                }
                Ok(Self {
                    platform,
                    arch: arch.to_string(),
                    macos_target: Some(target.to_string()),
                })
            }
            _ => Err(ConfigError::invalid_token(
                token,
                "expected <os>[-<macos-target>]-<arch>",
            )),
        }
    }

    /// Composite key, e.g. `macos-10.8-x86_64` or `linux-x86_64`
    pub fn platform_arch(&self) -> String {
        match &self.macos_target {
            Some(target) => format!("{}-{}-{}", self.platform, target, self.arch),
            None => format!("{}-{}", self.platform, self.arch),
        }
    }
}

impl fmt::Display for BuildIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.platform_arch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(Option<&'static str>);

    impl HostProbe for FixedProbe {
        fn machine_arch(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_windows_defaults_to_x86_64() {
        let probe = FixedProbe(Some("arm64"));
        assert_eq!(resolve_architecture(Platform::Windows, None, &probe), "x86_64");
    }

    #[test]
    fn test_unix_platforms_use_probe() {
        let probe = FixedProbe(Some("arm64"));
        assert_eq!(resolve_architecture(Platform::MacOs, None, &probe), "arm64");
        let probe = FixedProbe(Some("aarch64"));
        assert_eq!(resolve_architecture(Platform::Linux, None, &probe), "aarch64");
    }

    #[test]
    fn test_override_arch_wins() {
        let probe = FixedProbe(Some("arm64"));
        assert_eq!(
            resolve_architecture(Platform::MacOs, Some("universal"), &probe),
            "universal"
        );
    }

    #[test]
    fn test_probe_failure_falls_back_to_compile_target() {
        let probe = FixedProbe(None);
        assert_eq!(
            resolve_architecture(Platform::Linux, None, &probe),
            std::env::consts::ARCH
        );
    }

    #[test]
    fn test_arm64_forces_newer_target() {
        assert_eq!(resolve_macos_target("arm64", None), ARM64_MACOS_TARGET);
        assert_eq!(resolve_macos_target("arm64", Some("10.7")), ARM64_MACOS_TARGET);
        assert_eq!(resolve_macos_target("arm64", Some("12.0")), ARM64_MACOS_TARGET);
    }

    #[test]
    fn test_explicit_target_kept_for_x86_64() {
        assert_eq!(resolve_macos_target("x86_64", None), BASELINE_MACOS_TARGET);
        assert_eq!(resolve_macos_target("x86_64", Some("10.7")), "10.7");
    }

    #[test]
    fn test_identity_key() {
        let mac = BuildIdentity::new(Platform::MacOs, "x86_64", None);
        assert_eq!(mac.platform_arch(), "macos-10.8-x86_64");

        let arm = BuildIdentity::new(Platform::MacOs, "arm64", Some("10.8"));
        assert_eq!(arm.platform_arch(), "macos-11.1-arm64");

        let linux = BuildIdentity::new(Platform::Linux, "x86_64", Some("10.8"));
        assert_eq!(linux.macos_target, None);
        assert_eq!(linux.platform_arch(), "linux-x86_64");
    }

    #[test]
    fn test_resolve_with_explicit_platform() {
        let probe = FixedProbe(Some("x86_64"));
        let id = BuildIdentity::resolve(Some(Platform::Windows), None, None, &probe).unwrap();
        assert_eq!(id.platform_arch(), "windows-x86_64");
    }

    #[test]
    fn test_from_token() {
        let id = BuildIdentity::from_token("macos-10.7-x86_64").unwrap();
        assert_eq!(id.platform, Platform::MacOs);
        assert_eq!(id.macos_target.as_deref(), Some("10.7"));
        assert_eq!(id.arch, "x86_64");

        let id = BuildIdentity::from_token("windows-x86_64").unwrap();
        assert_eq!(id.platform, Platform::Windows);
        assert_eq!(id.macos_target, None);
    }

    #[test]
    fn test_from_token_rejects_malformed() {
        assert!(BuildIdentity::from_token("macos-x86_64").is_err());
        assert!(BuildIdentity::from_token("linux-10.8-x86_64").is_err());
        assert!(BuildIdentity::from_token("solaris-sparc").is_err());
        assert!(BuildIdentity::from_token("linux").is_err());
        assert!(BuildIdentity::from_token("linux--x86_64").is_err());
    }

    #[test]
    fn test_platform_parse_roundtrip_names() {
        for p in [Platform::MacOs, Platform::Linux, Platform::Windows] {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
        assert_eq!(Platform::Windows.exe_suffix(), ".exe");
        assert_eq!(Platform::Linux.exe_suffix(), "");
    }
}
