//! Debug symbol extraction after a build

use std::path::Path;

use agbuild_core::Platform;
use agbuild_process::{quote_arg, Runner};
use tracing::info;

use crate::context::Target;
use crate::error::Result;
use crate::fsutil;

/// Plugin variants built for every format
pub const PLUGIN_NAMES: [&str; 3] = ["AudioGridder", "AudioGridderInst", "AudioGridderMidi"];

/// macOS plugin formats: debug directory and bundle extension
const MACOS_FORMATS: [(&str, &str); 4] = [
    ("AU", "component"),
    ("VST", "vst"),
    ("VST3", "vst3"),
    ("AAX", "aaxplugin"),
];

/// Windows plugin formats: directory under `lib/` and plugin file extension
const WINDOWS_FORMATS: [(&str, &str); 3] = [("VST", "dll"), ("VST3", "vst3"), ("AAX", "aaxplugin")];

/// Recreate the debug symbol directory and fill it for the target platform
pub fn create_debug_symbols(target: &Target, runner: &dyn Runner) -> Result<()> {
    let debug_dir = target.debug_symbols_dir();
    runner.line(&format!("Creating debug symbols in {} ...", debug_dir.display()));
    fsutil::recreate_dir(&debug_dir)?;

    match target.identity.platform {
        Platform::MacOs => macos(target, &debug_dir, runner)?,
        Platform::Linux => linux(target, &debug_dir)?,
        Platform::Windows => windows(target, &debug_dir)?,
    }

    info!(dir = %debug_dir.display(), "debug symbols created");
    Ok(())
}

/// `(output, binary)` pairs for dsymutil, relative to the debug and build
/// directories
pub fn macos_dsym_jobs() -> Vec<(String, String)> {
    let mut jobs = vec![
        (
            "AudioGridderServer.dSYM".to_string(),
            "bin/AudioGridderServer.app/Contents/MacOS/AudioGridderServer".to_string(),
        ),
        (
            "AudioGridderPluginTray.dSYM".to_string(),
            "bin/AudioGridderPluginTray.app/Contents/MacOS/AudioGridderPluginTray".to_string(),
        ),
    ];
    for (dir, ext) in MACOS_FORMATS {
        for name in PLUGIN_NAMES {
            jobs.push((
                format!("{}/{}.dSYM", dir, name),
                format!("lib/{}.{}/Contents/MacOS/{}", name, ext, name),
            ));
        }
    }
    jobs
}

fn macos(target: &Target, debug_dir: &Path, runner: &dyn Runner) -> Result<()> {
    fsutil::copy_dir_all(&target.lib_dir(), &debug_dir.join("lib"))?;
    fsutil::copy_dir_all(&target.bin_dir(), &debug_dir.join("bin"))?;
    for (dir, _) in MACOS_FORMATS {
        std::fs::create_dir_all(debug_dir.join(dir))?;
    }

    let build_dir = target.build_dir();
    for (output, binary) in macos_dsym_jobs() {
        let command = format!(
            "dsymutil -o {} {}",
            quote_arg(&debug_dir.join(output).to_string_lossy()),
            quote_arg(&build_dir.join(binary).to_string_lossy()),
        );
        runner.simple(&command, Some(target.root.as_path()))?;
    }
    Ok(())
}

fn linux(target: &Target, debug_dir: &Path) -> Result<()> {
    fsutil::copy_into(&target.bin_dir().join("AudioGridderPluginTray"), debug_dir)?;
    for lib in fsutil::glob_in(&target.lib_dir(), "*.so") {
        fsutil::copy_into(&lib, debug_dir)?;
    }
    Ok(())
}

fn windows(target: &Target, debug_dir: &Path) -> Result<()> {
    let bin = target.bin_dir();
    for file in [
        "AudioGridderServer.exe",
        "AudioGridderServer.pdb",
        "AudioGridderPluginTray.exe",
        "AudioGridderPluginTray.pdb",
    ] {
        fsutil::copy_into(&bin.join(file), debug_dir)?;
    }

    let lib = target.lib_dir();
    for (format, ext) in WINDOWS_FORMATS {
        let dst = debug_dir.join(format);
        std::fs::create_dir_all(&dst)?;
        let format_dir = lib.join(format);
        let files = fsutil::glob_in(&format_dir, "*.pdb")
            .into_iter()
            .chain(fsutil::glob_in(&format_dir, &format!("*.{}", ext)));
        for file in files {
            if file.is_dir() {
                let name = file.file_name().map(|n| dst.join(n)).unwrap_or_else(|| dst.clone());
                fsutil::copy_dir_all(&file, &name)?;
            } else {
                fsutil::copy_into(&file, &dst)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use agbuild_core::{BuildIdentity, BuildLayout};
    use agbuild_process::RecordingRunner;
    use tempfile::TempDir;

    fn target(root: &Path, platform: Platform) -> Target {
        let identity = BuildIdentity::new(platform, "x86_64", None);
        let layout = BuildLayout::new(&identity, None);
        Target::new(root, identity, layout)
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_dsym_jobs() {
        let jobs = macos_dsym_jobs();
        assert_eq!(jobs.len(), 14);
        assert!(jobs.contains(&(
            "AU/AudioGridderInst.dSYM".to_string(),
            "lib/AudioGridderInst.component/Contents/MacOS/AudioGridderInst".to_string()
        )));
        assert!(jobs.contains(&(
            "AAX/AudioGridderMidi.dSYM".to_string(),
            "lib/AudioGridderMidi.aaxplugin/Contents/MacOS/AudioGridderMidi".to_string()
        )));
    }

    #[test]
    fn test_linux_symbols() {
        let temp = TempDir::new().unwrap();
        let target = target(temp.path(), Platform::Linux);
        touch(&target.bin_dir().join("AudioGridderPluginTray"));
        touch(&target.lib_dir().join("libAudioGridder.so"));
        touch(&target.lib_dir().join("AudioGridder.so"));
        touch(&target.lib_dir().join("libstatic.a"));

        let debug_dir = target.debug_symbols_dir();
        touch(&debug_dir.join("stale"));

        let runner = RecordingRunner::new();
        create_debug_symbols(&target, &runner).unwrap();

        assert!(!debug_dir.join("stale").exists());
        assert!(debug_dir.join("AudioGridderPluginTray").is_file());
        assert!(debug_dir.join("libAudioGridder.so").is_file());
        assert!(debug_dir.join("AudioGridder.so").is_file());
        assert!(!debug_dir.join("libstatic.a").exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_macos_runs_dsymutil() {
        let temp = TempDir::new().unwrap();
        let target = target(temp.path(), Platform::MacOs);
        touch(&target.bin_dir().join("crashpad_handler"));
        touch(&target.lib_dir().join("libfoo.a"));

        let runner = RecordingRunner::new();
        create_debug_symbols(&target, &runner).unwrap();

        let debug_dir = target.debug_symbols_dir();
        assert!(debug_dir.join("bin/crashpad_handler").is_file());
        assert!(debug_dir.join("lib/libfoo.a").is_file());
        for dir in ["AU", "VST", "VST3", "AAX"] {
            assert!(debug_dir.join(dir).is_dir());
        }
        let commands = runner.commands();
        assert_eq!(commands.len(), 14);
        assert!(commands.iter().all(|c| c.starts_with("dsymutil -o ")));
    }

    #[test]
    fn test_windows_symbols() {
        let temp = TempDir::new().unwrap();
        let target = target(temp.path(), Platform::Windows);
        for file in [
            "AudioGridderServer.exe",
            "AudioGridderServer.pdb",
            "AudioGridderPluginTray.exe",
            "AudioGridderPluginTray.pdb",
        ] {
            touch(&target.bin_dir().join(file));
        }
        touch(&target.lib_dir().join("VST/AudioGridder.dll"));
        touch(&target.lib_dir().join("VST/AudioGridder.pdb"));
        touch(&target.lib_dir().join("VST3/AudioGridder.vst3/Contents/x86_64-win/AudioGridder.vst3"));

        let runner = RecordingRunner::new();
        create_debug_symbols(&target, &runner).unwrap();

        let debug_dir = target.debug_symbols_dir();
        assert!(debug_dir.join("AudioGridderServer.pdb").is_file());
        assert!(debug_dir.join("VST/AudioGridder.dll").is_file());
        assert!(debug_dir.join("VST/AudioGridder.pdb").is_file());
        assert!(debug_dir
            .join("VST3/AudioGridder.vst3/Contents/x86_64-win/AudioGridder.vst3")
            .is_file());
        assert!(debug_dir.join("AAX").is_dir());
    }

    #[test]
    fn test_missing_tray_binary_is_fatal() {
        let temp = TempDir::new().unwrap();
        let target = target(temp.path(), Platform::Linux);
        let runner = RecordingRunner::new();
        let err = create_debug_symbols(&target, &runner).unwrap_err();
        assert!(matches!(err, StageError::MissingFile(_)));
    }
}
