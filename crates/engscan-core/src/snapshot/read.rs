use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::{ArtifactHash, ArtifactInfo};

/// A snapshot capture as it came off disk, before any parsing.
///
/// The bytes are kept so the JSON can be decoded once; the SHA-256 of those
/// same bytes is what a report quotes to pin down which capture it covers.
#[derive(Debug, Clone)]
pub struct ArtifactContext {
    /// Where the capture was loaded from, if anywhere.
    pub path: Option<String>,

    pub bytes: Vec<u8>,

    pub size_bytes: u64,

    pub hash_alg: String,

    /// Lowercase hex digest of `bytes`.
    pub hash_hex: String,
}

impl ArtifactContext {
    /// Wraps a capture held in memory, e.g. one produced by a headless
    /// browser without touching the filesystem.
    pub fn from_bytes(path: Option<String>, bytes: Vec<u8>) -> Self {
        let digest = Sha256::digest(&bytes);

        Self {
            path,
            size_bytes: bytes.len() as u64,
            bytes,
            hash_alg: "sha256".to_string(),
            hash_hex: hex::encode(digest),
        }
    }

    /// Report metadata for this capture. The raw bytes stay behind.
    pub fn into_artifact(self) -> ArtifactInfo {
        ArtifactInfo {
            path: self.path,
            size_bytes: self.size_bytes,
            hash: ArtifactHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        }
    }
}

/// Loads a capture file and fingerprints it.
///
/// Two captures with identical contents get the same fingerprint wherever
/// they live on disk.
pub fn read_artifact(path: &Path) -> Result<ArtifactContext> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read snapshot: {}", path.display()))?;

    Ok(ArtifactContext::from_bytes(Some(path.display().to_string()), bytes))
}
