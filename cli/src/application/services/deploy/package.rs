//! Package synchronisation: upload only when the remote hash differs.

use tracing::{debug, info};

use crate::application::ports::{PackageApi, ProgressReporter};
use crate::domain::error::SyncError;
use crate::domain::package::PackageArtifact;
use crate::domain::version::ServiceVersion;

/// Whether the package had to be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Uploaded,
    Unchanged,
}

/// Compare `artifact` with the package on `version` and upload on mismatch.
///
/// A version without a package counts as a mismatch.
///
/// # Errors
///
/// `FetchPackage` or `UploadFailed`.
pub async fn sync_package(
    api: &impl PackageApi,
    reporter: &impl ProgressReporter,
    version: &ServiceVersion,
    artifact: &PackageArtifact,
) -> Result<SyncOutcome, SyncError> {
    let remote = api
        .get_package_metadata(&version.service_id, version.number)
        .await
        .map_err(SyncError::FetchPackage)?;
    debug!(
        local = %artifact.hashsum,
        remote = remote.as_ref().map_or("", |m| m.hashsum.as_str()),
        "comparing package hashes"
    );

    if remote.is_some_and(|m| artifact.matches_remote(&m.hashsum)) {
        reporter.step(&format!(
            "Skipping package deployment, local and service version are identical. (service {}, version {})",
            version.service_id, version.number
        ));
        return Ok(SyncOutcome::Unchanged);
    }

    reporter.step("Uploading package...");
    api.upload_package(&version.service_id, version.number, &artifact.bytes)
        .await
        .map_err(SyncError::UploadFailed)?;
    info!(
        service_id = %version.service_id,
        version = version.number,
        bytes = artifact.bytes.len(),
        "uploaded package"
    );
    Ok(SyncOutcome::Uploaded)
}
