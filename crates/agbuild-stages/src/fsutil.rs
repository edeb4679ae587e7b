//! File system helpers shared by the stages

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, StageError};

/// Remove `dir` if it exists and create it empty
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "removing existing directory");
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Copy a file into a directory, keeping its name
pub fn copy_into(src: &Path, dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| StageError::MissingFile(src.to_path_buf()))?;
    let dst = dir.join(name);
    copy_file(src, &dst)?;
    Ok(dst)
}

/// Copy a file, reporting a missing source by name
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(StageError::MissingFile(src.to_path_buf()));
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

/// Recursively copy `src` to `dst`. `dst` must not exist yet.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(StageError::missing_directory("Directory", src));
    }
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Paths matching a glob pattern rooted at `base`, sorted
pub fn glob_in(base: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = base.join(pattern);
    let mut paths: Vec<PathBuf> = glob::glob(&full.to_string_lossy())
        .map(|matches| matches.filter_map(|m| m.ok()).collect())
        .unwrap_or_default();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_dir_all() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("a/b/file.txt"), "x").unwrap();
        std::fs::write(src.join("top.txt"), "y").unwrap();

        let dst = temp.path().join("dst");
        copy_dir_all(&src, &dst).unwrap();
        assert_eq!(std::fs::read_to_string(dst.join("a/b/file.txt")).unwrap(), "x");
        assert!(dst.join("top.txt").is_file());
    }

    #[test]
    fn test_recreate_dir_empties() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("d");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("old"), "").unwrap();
        recreate_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join("old").exists());
    }

    #[test]
    fn test_copy_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = copy_into(&temp.path().join("nope"), temp.path()).unwrap_err();
        assert!(matches!(err, StageError::MissingFile(_)));
    }

    #[test]
    fn test_glob_in() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("libb.so"), "").unwrap();
        std::fs::write(temp.path().join("liba.so"), "").unwrap();
        std::fs::write(temp.path().join("other.a"), "").unwrap();
        let found = glob_in(temp.path(), "*.so");
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("liba.so"));
    }
}
