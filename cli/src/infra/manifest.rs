//! Infrastructure implementation of the `ServiceIdStore` port.
//!
//! The manifest is rewritten atomically (temp file + rename) so an
//! interrupted write never leaves a truncated `edgeship.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ServiceIdStore;
use crate::domain::manifest::{MANIFEST_FILE, Manifest, with_service_id};

/// Project manifest on disk.
pub struct TomlManifestStore {
    path: PathBuf,
}

impl TomlManifestStore {
    /// Manifest in the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(MANIFEST_FILE))
    }

    /// Manifest at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or the `ConfigError`
    /// from validation.
    pub fn load(&self) -> Result<Manifest> {
        let content = self.read()?;
        Ok(Manifest::parse(&content)?)
    }

    fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).with_context(|| {
            format!(
                "error reading package manifest {}: run this command from the project root",
                self.path.display()
            )
        })
    }
}

impl Default for TomlManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceIdStore for TomlManifestStore {
    fn save_service_id(&self, service_id: Option<&str>) -> Result<()> {
        let content = self.read()?;
        let updated = with_service_id(&content, service_id)?;

        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, updated)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("updating {}", self.path.display()))?;
        Ok(())
    }
}
