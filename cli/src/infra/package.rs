//! Infrastructure implementation of the `PackageSource` port.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::PackageSource;
use crate::domain::package::{PackageArtifact, REQUIRED_ENTRIES};

/// Reads `.tar.gz` packages from the local filesystem.
pub struct LocalPackageSource;

impl PackageSource for LocalPackageSource {
    fn load(&self, path: &Path) -> Result<PackageArtifact> {
        let bytes = std::fs::read(path).with_context(|| {
            format!(
                "cannot read package {} (build it first, or pass --path)",
                path.display()
            )
        })?;
        validate_archive(&bytes).with_context(|| format!("invalid package {}", path.display()))?;
        Ok(PackageArtifact::new(path.to_path_buf(), bytes))
    }
}

/// Check `bytes` is a gzipped tarball containing every required entry.
///
/// # Errors
///
/// Returns an error naming the first missing entry, or the decoding failure.
pub fn validate_archive(bytes: &[u8]) -> Result<()> {
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(Cursor::new(bytes)));
    let mut found = vec![false; REQUIRED_ENTRIES.len()];
    for entry in tar.entries().context("reading archive")? {
        let entry = entry.context("reading archive entry")?;
        let path = entry.path().context("reading entry path")?;
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(i) = REQUIRED_ENTRIES.iter().position(|r| *r == file_name) {
            found[i] = true;
        }
    }
    if let Some(i) = found.iter().position(|f| !f) {
        anyhow::bail!("archive is missing {}", REQUIRED_ENTRIES[i]);
    }
    Ok(())
}
