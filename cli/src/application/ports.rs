//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `edgeship_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::Path;

use anyhow::Result;
use edgeship_common::{Backend, Domain, PackageMetadata, Service, Version};

use crate::domain::{BackendSpec, PackageArtifact, UserConfig};

// ── Platform API Port Traits ──────────────────────────────────────────────────

/// Service create/delete.
#[allow(async_fn_in_trait)]
pub trait ServiceApi {
    /// Create a compute service and return it (its version 1 exists implicitly).
    async fn create_service(&self, name: &str) -> Result<Service>;
    /// Delete a service.
    async fn delete_service(&self, service_id: &str) -> Result<()>;
}

/// Version listing, cloning, commenting, and activation.
#[allow(async_fn_in_trait)]
pub trait VersionApi {
    /// List every version of a service.
    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>>;
    /// Clone `version` into a new editable version and return it.
    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version>;
    /// Set the comment of a version.
    async fn update_version_comment(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<()>;
    /// Activate a version.
    async fn activate_version(&self, service_id: &str, version: u32) -> Result<()>;
}

/// Domains bound to a version.
#[allow(async_fn_in_trait)]
pub trait DomainApi {
    async fn list_domains(&self, service_id: &str, version: u32) -> Result<Vec<Domain>>;
    async fn create_domain(&self, service_id: &str, version: u32, name: &str) -> Result<Domain>;
    async fn delete_domain(&self, service_id: &str, version: u32, name: &str) -> Result<()>;
}

/// Backends configured on a version.
#[allow(async_fn_in_trait)]
pub trait BackendApi {
    async fn list_backends(&self, service_id: &str, version: u32) -> Result<Vec<Backend>>;
    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        spec: &BackendSpec,
    ) -> Result<Backend>;
    async fn delete_backend(&self, service_id: &str, version: u32, name: &str) -> Result<()>;
}

/// Package metadata and upload.
#[allow(async_fn_in_trait)]
pub trait PackageApi {
    /// Metadata of the package on a version, `None` when nothing was uploaded yet.
    async fn get_package_metadata(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Option<PackageMetadata>>;
    /// Upload package bytes to a version.
    async fn upload_package(&self, service_id: &str, version: u32, package: &[u8]) -> Result<()>;
}

/// Composite trait: any type implementing all five capability traits is a `PlatformApi`.
pub trait PlatformApi: ServiceApi + VersionApi + DomainApi + BackendApi + PackageApi {}

/// Blanket implementation: any type implementing all five sub-traits is a `PlatformApi`.
impl<T> PlatformApi for T where T: ServiceApi + VersionApi + DomainApi + BackendApi + PackageApi {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a step message only shown in verbose mode.
    fn detail(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Whether verbose output was requested.
    fn verbose(&self) -> bool;
}

// ── Operator Prompt Port ──────────────────────────────────────────────────────

/// Blocking request/response exchange with the operator.
pub trait Prompter {
    /// Ask for a line of text. `default` is shown in brackets and returned
    /// when the answer is blank. Returns an empty string for a blank answer
    /// without a default.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
}

// ── Local State Ports ─────────────────────────────────────────────────────────

/// Read/write handle on the service ID persisted in the project manifest.
pub trait ServiceIdStore {
    /// Persist `service_id`, or clear it with `None`.
    fn save_service_id(&self, service_id: Option<&str>) -> Result<()>;
}

/// Abstracts user configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, or defaults when the file does not exist.
    fn load(&self) -> Result<UserConfig>;
    /// Location of the configuration file.
    fn path(&self) -> Result<std::path::PathBuf>;
}

/// Loads and validates the package artifact.
pub trait PackageSource {
    fn load(&self, path: &Path) -> Result<PackageArtifact>;
}
