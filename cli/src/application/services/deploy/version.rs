//! Version resolution: pick the version to deploy to, cloning it when it can
//! no longer be edited.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::{debug, info};

use crate::application::ports::{ProgressReporter, VersionApi};
use crate::domain::error::ResolutionError;
use crate::domain::version::{ServiceVersion, VersionSelector, VersionStatus, select_version};

/// Result of resolving the target version of an existing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: ServiceVersion,
    /// The selected version was active or locked and got cloned.
    pub cloned: bool,
}

/// Resolve the editable version of `service_id` to deploy to.
///
/// `comment` is applied to the new version only when a clone happened; a
/// failure to set it is reported as a warning.
///
/// # Errors
///
/// `ListVersions`, `NoVersions`, `NoActiveVersion`, `VersionNotFound`, or
/// `CloneFailed`.
pub async fn resolve(
    api: &impl VersionApi,
    reporter: &impl ProgressReporter,
    service_id: &str,
    selector: Option<VersionSelector>,
    comment: Option<&str>,
) -> Result<ResolvedVersion, ResolutionError> {
    let versions = api
        .list_versions(service_id)
        .await
        .map_err(ResolutionError::ListVersions)?;
    let chosen = select_version(service_id, &versions, selector)?;
    let version = ServiceVersion::from_remote(service_id, chosen);
    debug!(service_id, version = version.number, status = ?version.status, "selected version");

    if version.is_editable() {
        return Ok(ResolvedVersion {
            version,
            cloned: false,
        });
    }

    reporter.detail(&format!(
        "Cloning version {} of service {service_id}...",
        version.number
    ));
    let clone = api
        .clone_version(service_id, version.number)
        .await
        .map_err(ResolutionError::CloneFailed)?;
    info!(service_id, from = version.number, to = clone.number, "cloned version");

    if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
        if let Err(e) = api
            .update_version_comment(service_id, clone.number, comment)
            .await
        {
            reporter.warn(&format!(
                "could not set comment on version {}: {e:#}",
                clone.number
            ));
        }
    }

    Ok(ResolvedVersion {
        version: ServiceVersion {
            service_id: service_id.to_string(),
            number: clone.number,
            status: VersionStatus::Inactive,
        },
        cloned: true,
    })
}
