//! Package artifact identity.
//!
//! Pure functions only: reading and validating the archive on disk is done
//! by `infra::package`.

use std::path::PathBuf;

use sha2::{Digest, Sha512};

/// Entries a deployable archive must contain (matched by file name at any depth).
pub const REQUIRED_ENTRIES: &[&str] = &["edgeship.toml", "main.wasm"];

/// A built package ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    pub path: PathBuf,
    /// SHA-512 of `bytes`, lower-case hex.
    pub hashsum: String,
    pub bytes: Vec<u8>,
}

impl PackageArtifact {
    #[must_use]
    pub fn new(path: PathBuf, bytes: Vec<u8>) -> Self {
        Self {
            path,
            hashsum: hashsum(&bytes),
            bytes,
        }
    }

    /// Upload is skipped iff this returns `true`.
    #[must_use]
    pub fn matches_remote(&self, remote_hashsum: &str) -> bool {
        !remote_hashsum.is_empty() && self.hashsum.eq_ignore_ascii_case(remote_hashsum.trim())
    }
}

/// SHA-512 hex digest of `bytes`.
#[must_use]
pub fn hashsum(bytes: &[u8]) -> String {
    hex_encode(&Sha512::digest(bytes))
}

/// Lower-case hex encoding.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
