//! Packaging outputs
//!
//! Every packaging strategy reports what it produced as a list of
//! [`Artifact`]s so the CLI can print the same summary for every platform.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// A file produced by packaging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Path to the artifact file
    pub path: PathBuf,

    /// Kind of artifact
    pub kind: ArtifactKind,

    /// Size in bytes, 0 if the file could not be read
    pub size: u64,

    /// SHA256 hash (hex encoded)
    pub sha256: Option<String>,
}

impl Artifact {
    /// Create an artifact, reading its size and hash from disk
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        let path = path.into();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let sha256 = match sha256_file(&path) {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not hash artifact");
                None
            }
        };

        let artifact = Self {
            path,
            kind,
            size,
            sha256,
        };
        info!(
            artifact = artifact.filename().unwrap_or_default(),
            kind = %artifact.kind,
            size = artifact.size,
            sha256 = artifact.sha256.as_deref().unwrap_or("-"),
            "artifact ready"
        );
        artifact
    }

    /// Get filename
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// First 12 hex digits of the hash, for summaries
    pub fn short_sha256(&self) -> Option<&str> {
        self.sha256.as_deref().map(|h| &h[..h.len().min(12)])
    }
}

/// Kind of packaging artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// macOS Installer Package (.pkg)
    Pkg,
    /// Zip archive
    Archive,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pkg => write!(f, "pkg"),
            Self::Archive => write!(f, "zip"),
        }
    }
}

/// Hash a file without loading it into memory
fn sha256_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
