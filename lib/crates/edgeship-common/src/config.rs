use serde::{Deserialize, Serialize};

/// Platform API settings, stored under `api:` in `~/.edgeship/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the platform REST API (default: https://api.edgeship.dev)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL of the management console (default: https://manage.edgeship.dev)
    #[serde(default = "default_manage_url")]
    pub manage_url: String,

    /// API token. `EDGESHIP_API_TOKEN` takes precedence when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_endpoint() -> String {
    "https://api.edgeship.dev".to_string()
}

fn default_manage_url() -> String {
    "https://manage.edgeship.dev".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            manage_url: default_manage_url(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Console URL for a service, e.g. `https://manage.edgeship.dev/configure/services/123`.
    #[must_use]
    pub fn service_url(&self, service_id: &str) -> String {
        format!(
            "{}/configure/services/{service_id}",
            self.manage_url.trim_end_matches('/')
        )
    }
}
