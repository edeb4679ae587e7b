//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "agbuild.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "agbuild.yaml";

pub const DEFAULT_DEPS_ROOT: &str = "audiogridder-deps";
pub const DEFAULT_SDKS_ROOT: &str = "audiogridder-sdks";
pub const DEFAULT_SIGNING_IDENTITY: &str = "AudioGridder";
pub const DEFAULT_KEYCHAIN: &str = "login.keychain";
pub const DEFAULT_SENTRY_ORG: &str = "e47";
pub const DEFAULT_SENTRY_PROJECT: &str = "audiogridder";
pub const DEFAULT_ISCC: &str = r"C:\Program Files (x86)\Inno Setup 6\ISCC.exe";
pub const DEFAULT_TESTS_DATA_DIR: &str = "Tests/Data";
pub const DEFAULT_FIXTURES_URL: &str = "https://audiogridder.com/tests-data";
pub const DEFAULT_LOG_TAIL_LINES: usize = 40;

/// Third-party plugins the server tests load
pub const DEFAULT_FIXTURES: &[&str] = &["macos.zip", "windows.zip"];

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".agbuild.toml",
        ".agbuild.yaml",
    ]
}

/// Generate the default configuration as TOML
pub fn default_config_toml() -> String {
    toml::to_string_pretty(&Config::default()).unwrap_or_default()
}
