//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod manifest;
pub mod package;
pub mod setup;
pub mod undo;
pub mod version;

pub use config::UserConfig;
pub use error::{
    ActivationError, ConfigError, DeployError, ProvisionError, ResolutionError, RollbackError,
    SyncError,
};
pub use manifest::{MANIFEST_FILE, Manifest, SetupBlock};
pub use package::PackageArtifact;
pub use setup::{BackendSpec, SetupConfiguration, SetupSource};
pub use undo::{RollbackReport, UndoKind, UndoStack, UndoStep};
pub use version::{ServiceVersion, VersionSelector, VersionStatus};
