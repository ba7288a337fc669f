//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Port failures arrive as `anyhow::Error` and are wrapped here with the name
//! of the deploy step that produced them.

use thiserror::Error;

use crate::domain::undo::{RollbackReport, UndoStep};

// ── Configuration errors ──────────────────────────────────────────────────────

/// Errors raised before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error parsing the [[setup.backends]] configuration: entry {entry}: `{field}` {reason}")]
    SetupBackend {
        /// 1-based position of the offending `[[setup.backends]]` entry.
        entry: usize,
        field: &'static str,
        reason: String,
    },

    #[error("error parsing the [setup] configuration: `{field}` {reason}")]
    SetupField { field: &'static str, reason: String },

    #[error("error parsing package manifest: {0}")]
    InvalidManifest(String),

    #[error("error configuring a backend (no input given)")]
    NoBackendConfigured,

    #[error("invalid port number '{0}': expected 1-65535")]
    InvalidPort(String),

    #[error("error reading input: {0:#}")]
    Prompt(#[source] anyhow::Error),

    #[error("error validating package: {0:#}")]
    InvalidPackage(#[source] anyhow::Error),
}

// ── Version resolution errors ─────────────────────────────────────────────────

/// Errors raised while choosing the service version to deploy to.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid version '{0}': expected 'latest', 'active', or a version number")]
    InvalidSelector(String),

    #[error(
        "a service ID is required to select a version. Pass --service-id or set service_id in the manifest."
    )]
    ServiceIdRequired,

    #[error("error listing service versions: {0:#}")]
    ListVersions(#[source] anyhow::Error),

    #[error("service '{0}' has no versions")]
    NoVersions(String),

    #[error("no active version found for service '{0}'")]
    NoActiveVersion(String),

    #[error("version {0} not found")]
    VersionNotFound(u32),

    #[error("error cloning service version: {0:#}")]
    CloneFailed(#[source] anyhow::Error),
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors raised while creating or discovering remote resources.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("error creating service: {0:#}")]
    CreateService(#[source] anyhow::Error),

    #[error("error saving package manifest: {0:#}")]
    PersistServiceId(#[source] anyhow::Error),

    #[error("error fetching service domains: {0:#}")]
    ListDomains(#[source] anyhow::Error),

    #[error("error fetching service backends: {0:#}")]
    ListBackends(#[source] anyhow::Error),

    #[error("error creating domain: {source:#}")]
    CreateDomain {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("error creating backend: {source:#}")]
    CreateBackend {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

// ── Package synchronisation errors ────────────────────────────────────────────

/// Errors raised while comparing or uploading the package.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("error fetching package metadata: {0:#}")]
    FetchPackage(#[source] anyhow::Error),

    #[error("error uploading package: {0:#}")]
    UploadFailed(#[source] anyhow::Error),
}

/// Activation of the target version failed.
#[derive(Debug, Error)]
#[error("error activating version: {0:#}")]
pub struct ActivationError(#[source] pub anyhow::Error);

/// A compensating delete failed during rollback.
#[derive(Debug, Error)]
#[error("error {step}: {source:#}")]
pub struct RollbackError {
    pub step: UndoStep,
    #[source]
    pub source: anyhow::Error,
}

// ── Orchestrator error ────────────────────────────────────────────────────────

/// Terminal error of a deploy run.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// The run failed after creating remote resources and those were undone.
    #[error("{cause}{}", .report.failure_note())]
    RolledBack {
        cause: Box<DeployError>,
        report: RollbackReport,
    },
}

impl DeployError {
    /// The error that stopped the run, looking through any rollback wrapper.
    #[must_use]
    pub fn root_cause(&self) -> &DeployError {
        match self {
            DeployError::RolledBack { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// The rollback report, when resources were undone.
    #[must_use]
    pub fn rollback(&self) -> Option<&RollbackReport> {
        match self {
            DeployError::RolledBack { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Short machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self.root_cause() {
            DeployError::Configuration(_) => "configuration_error",
            DeployError::Resolution(_) => "resolution_error",
            DeployError::Provision(_) => "provision_error",
            DeployError::Sync(_) => "sync_error",
            DeployError::Activation(_) => "activation_error",
            DeployError::RolledBack { .. } => "rollback_error",
        }
    }
}
