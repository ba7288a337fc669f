//! Project manifest (`edgeship.toml`) schema and strict `[setup]` parsing.
//!
//! Pure functions only: reading and writing the file is done by
//! `infra::manifest`.

use std::path::PathBuf;

use toml::{Table, Value};
use toml_edit::DocumentMut;

use crate::domain::error::ConfigError;
use crate::domain::setup::BackendSpec;

pub const MANIFEST_FILE: &str = "edgeship.toml";

/// Parsed project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub name: String,
    /// Empty strings are treated as unset.
    pub service_id: Option<String>,
    pub setup: Option<SetupBlock>,
}

/// The `[setup]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupBlock {
    pub backends: Vec<BackendSpec>,
    pub domain: Option<String>,
}

impl Manifest {
    /// Parse manifest text. The `[setup]` block is validated strictly so a
    /// bad entry aborts the deploy before anything remote happens.
    ///
    /// # Errors
    ///
    /// `InvalidManifest` for malformed TOML or a missing `name`;
    /// `SetupBackend` / `SetupField` naming the offending setup field.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::InvalidManifest(e.message().to_string()))?;

        let name = match table.get("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(_) => {
                return Err(ConfigError::InvalidManifest(
                    "`name` must be a non-empty string".to_string(),
                ));
            }
            None => return Err(ConfigError::InvalidManifest("missing `name`".to_string())),
        };

        let service_id = match table.get("service_id") {
            None => None,
            Some(Value::String(s)) => Some(s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            Some(_) => {
                return Err(ConfigError::InvalidManifest(
                    "`service_id` must be a string".to_string(),
                ));
            }
        };

        let setup = table.get("setup").map(parse_setup).transpose()?;

        Ok(Self {
            name,
            service_id,
            setup,
        })
    }

    /// Conventional artifact location: `pkg/<name>.tar.gz`.
    #[must_use]
    pub fn default_package_path(&self) -> PathBuf {
        PathBuf::from("pkg").join(format!("{}.tar.gz", self.name))
    }

    /// Declared backends, if the manifest has any.
    #[must_use]
    pub fn declared_backends(&self) -> Option<&[BackendSpec]> {
        self.setup
            .as_ref()
            .map(|s| s.backends.as_slice())
            .filter(|b| !b.is_empty())
    }

    #[must_use]
    pub fn declared_domain(&self) -> Option<&str> {
        self.setup.as_ref().and_then(|s| s.domain.as_deref())
    }
}

fn parse_setup(value: &Value) -> Result<SetupBlock, ConfigError> {
    let Value::Table(setup) = value else {
        return Err(ConfigError::SetupField {
            field: "setup",
            reason: format!("must be a table, got {}", value.type_str()),
        });
    };

    let domain = match setup.get("domain") {
        None => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::String(_)) => {
            return Err(ConfigError::SetupField {
                field: "domain",
                reason: "must not be empty".to_string(),
            });
        }
        Some(other) => {
            return Err(ConfigError::SetupField {
                field: "domain",
                reason: format!("must be a string, got {}", other.type_str()),
            });
        }
    };

    let backends = match setup.get("backends") {
        None => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_backend(i + 1, entry))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ConfigError::SetupField {
                field: "backends",
                reason: format!("must be an array of tables, got {}", other.type_str()),
            });
        }
    };

    Ok(SetupBlock { backends, domain })
}

fn parse_backend(entry: usize, value: &Value) -> Result<BackendSpec, ConfigError> {
    let err = |field: &'static str, reason: String| ConfigError::SetupBackend {
        entry,
        field,
        reason,
    };

    let Value::Table(t) = value else {
        return Err(err("backends", format!("must be a table, got {}", value.type_str())));
    };

    let address = match t.get("address") {
        None => return Err(err("address", "is required".to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(err("address", "must not be empty".to_string()));
        }
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(err("address", format!("must be a string, got {}", other.type_str())));
        }
    };

    let port = match t.get("port") {
        None => None,
        Some(Value::Integer(p)) => Some(
            u16::try_from(*p)
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| err("port", format!("must be between 1 and 65535, got {p}")))?,
        ),
        Some(other) => {
            return Err(err("port", format!("must be an integer, got {}", other.type_str())));
        }
    };

    let name = optional_string(t, "name").map_err(|r| err("name", r))?;
    let prompt = optional_string(t, "prompt").map_err(|r| err("prompt", r))?;

    let mut spec = BackendSpec::new(address, port, name);
    spec.prompt = prompt.map(str::to_string);
    Ok(spec)
}

fn optional_string<'a>(t: &'a Table, key: &str) -> Result<Option<&'a str>, String> {
    match t.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(format!("must be a string, got {}", other.type_str())),
    }
}

/// Return `content` with `service_id` set, or emptied when `service_id` is `None`.
///
/// Only the `service_id` value changes; comments, key order and formatting
/// of the rest of the document are kept.
///
/// # Errors
///
/// Returns `InvalidManifest` if `content` is not valid TOML.
pub fn with_service_id(content: &str, service_id: Option<&str>) -> Result<String, ConfigError> {
    let mut doc: DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| ConfigError::InvalidManifest(e.message().to_string()))?;
    doc["service_id"] = toml_edit::value(service_id.unwrap_or_default());
    Ok(doc.to_string())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
