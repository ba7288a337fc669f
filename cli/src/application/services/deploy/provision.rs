//! Resource provisioning and rollback.
//!
//! Every successful create pushes its compensating delete onto the run's
//! [`UndoStack`] before the next call is made.

use tracing::{info, warn};

use crate::application::ports::{
    BackendApi, DomainApi, ProgressReporter, ServiceApi, ServiceIdStore,
};
use crate::domain::error::{DeployError, ProvisionError, RollbackError};
use crate::domain::setup::SetupConfiguration;
use crate::domain::undo::{RollbackReport, UndoStack, UndoStep};
use crate::domain::version::ServiceVersion;

/// Create a new service named `name` and persist its ID.
///
/// # Errors
///
/// `CreateService`, or `PersistServiceId` when the manifest cannot be written
/// (the service is already on the undo stack at that point).
pub async fn create_service(
    api: &impl ServiceApi,
    store: &impl ServiceIdStore,
    reporter: &impl ProgressReporter,
    name: &str,
    undo: &mut UndoStack,
) -> Result<ServiceVersion, DeployError> {
    reporter.step("Creating service...");
    let service = api
        .create_service(name)
        .await
        .map_err(ProvisionError::CreateService)?;
    info!(service_id = %service.id, name, "created service");
    undo.push(UndoStep::DeleteService {
        service_id: service.id.clone(),
    });

    reporter.step(&format!(
        "Setting service ID in manifest to \"{}\"...",
        service.id
    ));
    store
        .save_service_id(Some(&service.id))
        .map_err(ProvisionError::PersistServiceId)?;

    Ok(ServiceVersion::initial(&service.id))
}

/// Create the planned domain and backends on `version`, in order.
///
/// # Errors
///
/// `CreateDomain` or `CreateBackend` for the first create that fails.
pub async fn provision(
    api: &(impl DomainApi + BackendApi),
    reporter: &impl ProgressReporter,
    version: &ServiceVersion,
    setup: &SetupConfiguration,
    undo: &mut UndoStack,
) -> Result<(), DeployError> {
    let ServiceVersion {
        service_id,
        number,
        ..
    } = version;

    if let Some(domain) = &setup.domain {
        if reporter.verbose() {
            reporter.step(&format!("Creating domain '{domain}'..."));
        } else {
            reporter.step("Creating domain...");
        }
        api.create_domain(service_id, *number, domain)
            .await
            .map_err(|source| ProvisionError::CreateDomain {
                name: domain.clone(),
                source,
            })?;
        info!(%service_id, version = number, %domain, "created domain");
        undo.push(UndoStep::DeleteDomain {
            service_id: service_id.clone(),
            version: *number,
            name: domain.clone(),
        });
    }

    for backend in &setup.backends {
        if reporter.verbose() {
            reporter.step(&format!(
                "Creating backend '{}' (port: {}, name: {})...",
                backend.address, backend.port, backend.name
            ));
        } else {
            reporter.step(&format!("Creating backend '{}'...", backend.address));
        }
        api.create_backend(service_id, *number, backend)
            .await
            .map_err(|source| ProvisionError::CreateBackend {
                name: backend.name.clone(),
                source,
            })?;
        info!(%service_id, version = number, backend = %backend.name, "created backend");
        undo.push(UndoStep::DeleteBackend {
            service_id: service_id.clone(),
            version: *number,
            name: backend.name.clone(),
        });
    }

    Ok(())
}

/// Drain `undo` newest-first, attempting every step exactly once.
///
/// Failures are collected, never retried, and never stop the remaining steps.
pub async fn rollback(
    api: &(impl ServiceApi + DomainApi + BackendApi),
    store: &impl ServiceIdStore,
    reporter: &impl ProgressReporter,
    undo: &mut UndoStack,
) -> RollbackReport {
    let mut report = RollbackReport::default();
    for step in undo.drain_reverse() {
        reporter.detail(&format!("Rolling back: {step}..."));
        let result = match &step {
            UndoStep::DeleteBackend {
                service_id,
                version,
                name,
            } => api.delete_backend(service_id, *version, name).await,
            UndoStep::DeleteDomain {
                service_id,
                version,
                name,
            } => api.delete_domain(service_id, *version, name).await,
            UndoStep::DeleteService { service_id } => {
                match api.delete_service(service_id).await {
                    Ok(()) => store.save_service_id(None).map(|()| {
                        report.service_id_cleared = true;
                    }),
                    Err(e) => Err(e),
                }
            }
        };
        match result {
            Ok(()) => info!(kind = ?step.kind(), target = step.target(), "rolled back"),
            Err(source) => {
                warn!(
                    kind = ?step.kind(),
                    target = step.target(),
                    error = %format!("{source:#}"),
                    "rollback step failed"
                );
                let failure = RollbackError {
                    step: step.clone(),
                    source,
                };
                reporter.warn(&failure.to_string());
                report.failures.push(failure);
            }
        }
        report.attempted.push(step);
    }
    report
}
