//! Archiving debug symbols next to earlier releases

use std::path::{Path, PathBuf};

use tracing::info;

use crate::context::Target;
use crate::error::{Result, StageError};
use crate::fsutil;

/// Copy the debug symbol directory to `<dest>/Builds/<version>/debug-sym-<key>`.
///
/// A previous copy for the same version and identity is replaced.
pub fn archive_debug_symbols(target: &Target, version: &str, dest: &Path) -> Result<PathBuf> {
    let debug_dir = target.debug_symbols_dir();
    if !debug_dir.is_dir() {
        return Err(StageError::missing_directory("Debug symbol directory", debug_dir));
    }

    let version_dir = dest.join("Builds").join(version);
    std::fs::create_dir_all(&version_dir)?;

    let archived = version_dir.join(format!("debug-sym-{}", target.identity.platform_arch()));
    if archived.exists() {
        std::fs::remove_dir_all(&archived)?;
    }

    info!(from = %debug_dir.display(), to = %archived.display(), "archiving debug symbols");
    fsutil::copy_dir_all(&debug_dir, &archived)?;
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agbuild_core::{BuildIdentity, BuildLayout};
    use tempfile::TempDir;

    fn target(root: &Path) -> Target {
        let identity = BuildIdentity::from_token("linux-x86_64").unwrap();
        let layout = BuildLayout::new(&identity, None);
        Target::new(root, identity, layout)
    }

    #[test]
    fn test_archive_replaces_previous_copy() {
        let project = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let target = target(project.path());

        let debug_dir = target.debug_symbols_dir();
        std::fs::create_dir_all(&debug_dir).unwrap();
        std::fs::write(debug_dir.join("AudioGridder.so"), b"sym").unwrap();

        let stale = dest.path().join("Builds/1.2.0/debug-sym-linux-x86_64/old.so");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"old").unwrap();

        let archived = archive_debug_symbols(&target, "1.2.0", dest.path()).unwrap();
        assert_eq!(archived, dest.path().join("Builds/1.2.0/debug-sym-linux-x86_64"));
        assert!(archived.join("AudioGridder.so").is_file());
        assert!(!stale.exists());
    }

    #[test]
    fn test_missing_debug_dir() {
        let project = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let err = archive_debug_symbols(&target(project.path()), "1.2.0", dest.path()).unwrap_err();
        assert!(matches!(err, StageError::MissingDirectory { .. }));
        assert!(!dest.path().join("Builds").exists());
    }
}
