//! Editor settings for the CMake Tools extension
//!
//! Instead of running CMake, configure can record its parameters in
//! `.vscode/settings.json` so the editor configures the tree itself. The file
//! is read, the CMake keys are replaced and every other key is kept.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::configure::CmakeParam;
use crate::error::Result;

/// Settings file, relative to the project root
pub const SETTINGS_FILE: &str = ".vscode/settings.json";

const BUILD_DIRECTORY_KEY: &str = "cmake.buildDirectory";
const CONFIGURE_SETTINGS_KEY: &str = "cmake.configureSettings";
const CONFIGURE_ARGS_KEY: &str = "cmake.configureArgs";

/// Merge configure parameters into the settings file at `path`
pub fn write_cmake_settings(path: &Path, params: &[CmakeParam]) -> Result<()> {
    let mut root = read_settings(path)?;

    let mut defines = Map::new();
    let mut args = Vec::new();
    for param in params {
        match param {
            CmakeParam::BuildDir(dir) => {
                let dir = if Path::new(dir).is_absolute() {
                    dir.clone()
                } else {
                    format!("${{workspaceFolder}}/{}", dir)
                };
                root.insert(BUILD_DIRECTORY_KEY.to_string(), Value::String(dir));
            }
            CmakeParam::Define(name, value) => {
                defines.insert(name.clone(), Value::String(value.clone()));
            }
            CmakeParam::Arg(arg) => args.push(Value::String(arg.clone())),
        }
    }
    root.insert(CONFIGURE_SETTINGS_KEY.to_string(), Value::Object(defines));
    root.insert(CONFIGURE_ARGS_KEY.to_string(), Value::Array(args));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(&Value::Object(root))?;
    content.push('\n');
    std::fs::write(path, content)?;
    debug!(path = %path.display(), "wrote editor settings");
    Ok(())
}

fn read_settings(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params() -> Vec<CmakeParam> {
        vec![
            CmakeParam::BuildDir("build-windows-x86_64".to_string()),
            CmakeParam::Define("AG_DEPS_ROOT".to_string(), "C:/deps/windows-x86_64".to_string()),
            CmakeParam::Arg("-A".to_string()),
            CmakeParam::Arg("x64".to_string()),
        ]
    }

    #[test]
    fn test_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        write_cmake_settings(&path, &params()).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value[BUILD_DIRECTORY_KEY],
            "${workspaceFolder}/build-windows-x86_64"
        );
        assert_eq!(
            value[CONFIGURE_SETTINGS_KEY]["AG_DEPS_ROOT"],
            "C:/deps/windows-x86_64"
        );
        assert_eq!(value[CONFIGURE_ARGS_KEY], serde_json::json!(["-A", "x64"]));
    }

    #[test]
    fn test_preserves_unrelated_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"editor.tabSize": 4, "cmake.configureSettings": {"STALE": "1"}}"#,
        )
        .unwrap();

        write_cmake_settings(&path, &params()).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["editor.tabSize"], 4);
        assert!(value[CONFIGURE_SETTINGS_KEY].get("STALE").is_none());
    }
}
