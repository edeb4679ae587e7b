//! Zip archive writing and extraction

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, StageError};

/// Writes a deflate-compressed zip archive
pub struct ZipBuilder {
    path: PathBuf,
    writer: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl ZipBuilder {
    /// Create (or truncate) the archive at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipWriter::new(file),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        })
    }

    /// Add a single file under `name`
    pub fn add_file(&mut self, src: &Path, name: &str) -> Result<()> {
        let mut input = File::open(src).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StageError::MissingFile(src.to_path_buf()),
            _ => StageError::Io(e),
        })?;
        self.writer
            .start_file(name.replace('\\', "/"), self.options)
            .map_err(|e| StageError::archive(&self.path, e))?;
        io::copy(&mut input, &mut self.writer)?;
        Ok(())
    }

    /// Add a file, or a directory with everything below it, under `name`
    pub fn add_path(&mut self, src: &Path, name: &str) -> Result<()> {
        if !src.is_dir() {
            return self.add_file(src, name);
        }
        for entry in WalkDir::new(src) {
            let entry = entry.map_err(|e| StageError::archive(&self.path, e))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| StageError::archive(&self.path, e))?;
            let entry_name = Path::new(name).join(relative);
            let entry_name = entry_name.to_string_lossy().replace('\\', "/");
            if entry.file_type().is_dir() {
                self.writer
                    .add_directory(entry_name, self.options)
                    .map_err(|e| StageError::archive(&self.path, e))?;
            } else {
                self.add_file(entry.path(), &entry_name)?;
            }
        }
        Ok(())
    }

    /// Finish writing and return the archive path
    pub fn finish(self) -> Result<PathBuf> {
        self.writer
            .finish()
            .map_err(|e| StageError::archive(&self.path, e))?;
        debug!(path = %self.path.display(), "wrote archive");
        Ok(self.path)
    }
}

/// Extract every entry of `archive` into `dest`
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| StageError::archive(archive, e))?;
    zip.extract(dest).map_err(|e| StageError::archive(archive, e))?;
    debug!(archive = %archive.display(), dest = %dest.display(), "extracted archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_extract() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("Plugin.vst3/Contents");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join("binary"), b"vst3").unwrap();
        std::fs::write(temp.path().join("Server.exe"), b"exe").unwrap();

        let zip_path = temp.path().join("out.zip");
        let mut builder = ZipBuilder::create(&zip_path).unwrap();
        builder
            .add_path(&temp.path().join("Server.exe"), "bin/Server.exe")
            .unwrap();
        builder
            .add_path(&temp.path().join("Plugin.vst3"), "lib/VST3/Plugin.vst3")
            .unwrap();
        builder.finish().unwrap();

        let dest = temp.path().join("extracted");
        extract(&zip_path, &dest).unwrap();
        assert_eq!(std::fs::read(dest.join("bin/Server.exe")).unwrap(), b"exe");
        assert_eq!(
            std::fs::read(dest.join("lib/VST3/Plugin.vst3/Contents/binary")).unwrap(),
            b"vst3"
        );
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let mut builder = ZipBuilder::create(&temp.path().join("out.zip")).unwrap();
        let err = builder
            .add_file(&temp.path().join("nope.exe"), "nope.exe")
            .unwrap_err();
        assert!(matches!(err, StageError::MissingFile(_)));
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let bogus = temp.path().join("bogus.zip");
        std::fs::write(&bogus, b"not a zip").unwrap();
        let err = extract(&bogus, temp.path()).unwrap_err();
        assert!(matches!(err, StageError::Archive { .. }));
    }
}
