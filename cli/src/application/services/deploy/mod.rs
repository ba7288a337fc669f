//! Application service: deploy use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! A run moves through a fixed sequence of stages:
//!
//! ```text
//! Init -> ResolveVersion -> LoadSetup -> Provision -> SyncPackage -> Activate -> Done
//! ```
//!
//! Init is local only (package validation, argument checks). Any failure
//! after a remote create drains the undo stack before the error is returned.

pub mod package;
pub mod provision;
pub mod setup;
pub mod version;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::ports::{
    PackageSource, PlatformApi, ProgressReporter, Prompter, ServiceIdStore,
};
use crate::domain::error::{ActivationError, ConfigError, DeployError, ResolutionError};
use crate::domain::manifest::Manifest;
use crate::domain::package::PackageArtifact;
use crate::domain::undo::UndoStack;
use crate::domain::version::VersionSelector;

use self::package::SyncOutcome;

/// Inputs of a deploy run.
pub struct DeployOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub manifest: &'a Manifest,
    /// Explicit service ID; falls back to the manifest value.
    pub service_id: Option<&'a str>,
    pub version: Option<VersionSelector>,
    /// Package path; falls back to `pkg/<name>.tar.gz`.
    pub package_path: Option<&'a Path>,
    /// Never prompt the operator.
    pub accept_defaults: bool,
    /// Comment set on a freshly cloned version.
    pub comment: Option<&'a str>,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStatus {
    /// The target version was activated.
    Activated,
    /// Nothing changed remotely; no activation was made.
    Skipped,
}

/// Outcome of a successful deploy run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployOutcome {
    pub service_id: String,
    pub version: u32,
    pub status: DeployStatus,
    /// The service was created by this run.
    pub new_service: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Names of the backends created by this run.
    pub backends_created: Vec<String>,
}

/// Deploy the package to the service, creating the service when needed.
///
/// # Errors
///
/// Returns the first failing stage's error. When remote resources had been
/// created the error is wrapped in [`DeployError::RolledBack`].
pub async fn deploy(
    api: &impl PlatformApi,
    store: &impl ServiceIdStore,
    packages: &impl PackageSource,
    prompter: &impl Prompter,
    opts: DeployOptions<'_, impl ProgressReporter>,
) -> Result<DeployOutcome, DeployError> {
    // Init: nothing here touches the platform.
    let default_path = opts.manifest.default_package_path();
    let path = opts.package_path.unwrap_or(&default_path);
    let artifact = packages
        .load(path)
        .map_err(ConfigError::InvalidPackage)?;
    debug!(path = %path.display(), hashsum = %artifact.hashsum, "loaded package");

    let service_id = opts
        .service_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .or(opts.manifest.service_id.as_deref());
    if service_id.is_none() && opts.version.is_some() {
        return Err(ResolutionError::ServiceIdRequired.into());
    }

    let mut undo = UndoStack::new();
    match run(api, store, prompter, &opts, &artifact, service_id, &mut undo).await {
        Ok(outcome) => Ok(outcome),
        Err(cause) if undo.is_empty() => Err(cause),
        Err(cause) => {
            info!(steps = undo.len(), error = %cause, "rolling back");
            let report = provision::rollback(api, store, opts.reporter, &mut undo).await;
            Err(DeployError::RolledBack {
                cause: Box::new(cause),
                report,
            })
        }
    }
}

async fn run(
    api: &impl PlatformApi,
    store: &impl ServiceIdStore,
    prompter: &impl Prompter,
    opts: &DeployOptions<'_, impl ProgressReporter>,
    artifact: &PackageArtifact,
    service_id: Option<&str>,
    undo: &mut UndoStack,
) -> Result<DeployOutcome, DeployError> {
    let reporter = opts.reporter;

    // ResolveVersion
    let resolved = match service_id {
        Some(id) => Some(version::resolve(api, reporter, id, opts.version, opts.comment).await?),
        None => None,
    };

    // LoadSetup
    let plan = setup::load_setup(
        api,
        prompter,
        reporter,
        opts.manifest,
        opts.accept_defaults,
        resolved.as_ref().map(|r| &r.version),
    )
    .await?;

    // Provision
    let target = match &resolved {
        Some(r) => r.version.clone(),
        None => provision::create_service(api, store, reporter, &opts.manifest.name, undo).await?,
    };
    provision::provision(api, reporter, &target, &plan.create, undo).await?;

    // SyncPackage
    let synced = package::sync_package(api, reporter, &target, artifact).await?;

    let mut outcome = DeployOutcome {
        service_id: target.service_id.clone(),
        version: target.number,
        status: DeployStatus::Skipped,
        new_service: resolved.is_none(),
        domain: plan.domain().map(str::to_string),
        backends_created: plan.create.backends.iter().map(|b| b.name.clone()).collect(),
    };

    let cloned = resolved.as_ref().is_some_and(|r| r.cloned);
    if synced == SyncOutcome::Unchanged && undo.is_empty() && !cloned {
        info!(service_id = %target.service_id, version = target.number, "nothing to deploy");
        return Ok(outcome);
    }

    // Activate
    reporter.step("Activating version...");
    api.activate_version(&target.service_id, target.number)
        .await
        .map_err(ActivationError)?;
    info!(service_id = %target.service_id, version = target.number, "activated version");

    outcome.status = DeployStatus::Activated;
    Ok(outcome)
}
