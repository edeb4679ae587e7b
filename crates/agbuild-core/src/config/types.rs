//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults;

/// Project configuration for agbuild
///
/// Every field has a default, so an absent or partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dependency and SDK roots
    pub paths: PathsConfig,

    /// Code signing on macOS
    pub signing: SigningConfig,

    /// Crash reporting symbol upload
    pub sentry: SentryConfig,

    /// Installer tooling
    pub packaging: PackagingConfig,

    /// Test pass settings
    pub tests: TestsConfig,
}

/// Dependency and SDK roots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Prebuilt dependencies root, one subdirectory per platform key
    pub deps_root: String,

    /// Non-public AAX and VST2 SDKs root
    pub sdks_root: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            deps_root: defaults::DEFAULT_DEPS_ROOT.to_string(),
            sdks_root: defaults::DEFAULT_SDKS_ROOT.to_string(),
        }
    }
}

/// Code signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Identity passed to `codesign --sign`
    pub identity: String,

    /// Keychain unlocked before signing when a password is supplied
    pub keychain: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            identity: defaults::DEFAULT_SIGNING_IDENTITY.to_string(),
            keychain: defaults::DEFAULT_KEYCHAIN.to_string(),
        }
    }
}

/// Sentry organisation and project for debug symbol uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    pub org: String,
    pub project: String,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            org: defaults::DEFAULT_SENTRY_ORG.to_string(),
            project: defaults::DEFAULT_SENTRY_PROJECT.to_string(),
        }
    }
}

/// Installer tooling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    /// Path to the Inno Setup compiler
    pub iscc: String,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            iscc: defaults::DEFAULT_ISCC.to_string(),
        }
    }
}

/// Test pass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestsConfig {
    /// Directory holding downloaded fixture plugins
    pub data_dir: String,

    /// Base URL the fixture archives are fetched from
    pub fixtures_url: String,

    /// Fixture archive names, appended to `fixtures_url`
    pub fixtures: Vec<String>,

    /// Lines of output echoed from a failed test run when a log file is written
    pub log_tail_lines: usize,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::DEFAULT_TESTS_DATA_DIR.to_string(),
            fixtures_url: defaults::DEFAULT_FIXTURES_URL.to_string(),
            fixtures: defaults::DEFAULT_FIXTURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_tail_lines: defaults::DEFAULT_LOG_TAIL_LINES,
        }
    }
}
