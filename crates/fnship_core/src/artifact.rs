use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::DeployError;

/// Probe order for the packaged bundle, relative to the invocation directory.
/// `dist/function.zip` is where the packaging task writes; the bare names are
/// kept for repositories that still package by hand.
pub const ARTIFACT_CANDIDATES: &[&str] = &["dist/function.zip", "function.zip", "deployment.zip"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBundle {
    path: PathBuf,
    bytes: Vec<u8>,
    sha256_hex: String,
}

impl ArtifactBundle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn sha256_hex(&self) -> &str {
        &self.sha256_hex
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns the first candidate that exists as a regular file, fully read.
/// A candidate that exists but cannot be read is a failure, not a reason to
/// keep probing: a half-usable bundle must never be silently skipped.
pub fn locate_artifact(search_root: &Path) -> Result<ArtifactBundle, DeployError> {
    for candidate in ARTIFACT_CANDIDATES {
        let path = search_root.join(candidate);
        if !path.is_file() {
            continue;
        }

        let bytes = fs::read(&path).map_err(|error| DeployError::ArtifactNotFound {
            detail: format!("{} exists but could not be read: {error}", path.display()),
        })?;
        let sha256_hex = digest_hex(&bytes);
        return Ok(ArtifactBundle {
            path,
            bytes,
            sha256_hex,
        });
    }

    Err(DeployError::ArtifactNotFound {
        detail: format!("no deployable bundle at any of: {}", ARTIFACT_CANDIDATES.join(", ")),
    })
}

fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
