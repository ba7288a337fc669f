//! Service version selection rules.
//!
//! Pure functions only: the remote listing and the clone call live in the
//! deploy service.

use std::fmt;
use std::str::FromStr;

use edgeship_common::Version;

use crate::domain::error::ResolutionError;

/// How the operator picked the version to deploy to (`--version`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    Latest,
    Active,
    Number(u32),
}

impl FromStr for VersionSelector {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "active" => Ok(Self::Active),
            other => other
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Number)
                .ok_or_else(|| ResolutionError::InvalidSelector(s.to_string())),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Active => f.write_str("active"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Activation status of a version, read once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    Active,
    Locked,
    Inactive,
}

/// The version a deploy operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceVersion {
    pub service_id: String,
    pub number: u32,
    pub status: VersionStatus,
}

impl ServiceVersion {
    #[must_use]
    pub fn from_remote(service_id: &str, version: &Version) -> Self {
        let status = if version.active {
            VersionStatus::Active
        } else if version.locked {
            VersionStatus::Locked
        } else {
            VersionStatus::Inactive
        };
        Self {
            service_id: service_id.to_string(),
            number: version.number,
            status,
        }
    }

    /// Version 1 of a service this run just created.
    #[must_use]
    pub fn initial(service_id: &str) -> Self {
        Self {
            service_id: service_id.to_string(),
            number: 1,
            status: VersionStatus::Inactive,
        }
    }

    /// Domains, backends, and packages can only change on an inactive version.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == VersionStatus::Inactive
    }
}

/// Pick a version from the remote list.
///
/// No selector means the most recent version.
///
/// # Errors
///
/// `NoVersions` for an empty list, `NoActiveVersion` when `active` is asked
/// for and none is, `VersionNotFound` for an unknown number.
pub fn select_version<'a>(
    service_id: &str,
    versions: &'a [Version],
    selector: Option<VersionSelector>,
) -> Result<&'a Version, ResolutionError> {
    if versions.is_empty() {
        return Err(ResolutionError::NoVersions(service_id.to_string()));
    }
    match selector.unwrap_or(VersionSelector::Latest) {
        VersionSelector::Latest => versions
            .iter()
            .max_by_key(|v| v.number)
            .ok_or_else(|| ResolutionError::NoVersions(service_id.to_string())),
        VersionSelector::Active => versions
            .iter()
            .find(|v| v.active)
            .ok_or_else(|| ResolutionError::NoActiveVersion(service_id.to_string())),
        VersionSelector::Number(n) => versions
            .iter()
            .find(|v| v.number == n)
            .ok_or(ResolutionError::VersionNotFound(n)),
    }
}
