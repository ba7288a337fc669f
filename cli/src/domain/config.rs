//! User configuration schema (`~/.edgeship/config.yaml`).
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use edgeship_common::ApiConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `~/.edgeship/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Platform API settings.
    pub api: ApiConfig,
}

impl UserConfig {
    /// Resolve the API token: the environment value wins over the file.
    ///
    /// Blank values count as unset.
    #[must_use]
    pub fn token(&self, env_token: Option<&str>) -> Option<String> {
        env_token
            .or(self.api.token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
