//! Compensating actions for a single deploy run.
//!
//! The platform has no multi-resource transactions, so every successful
//! create pushes the delete that reverses it. On failure the stack is drained
//! newest-first. Nothing here is persisted.

use std::fmt;

use crate::domain::error::RollbackError;

/// Kind of compensating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    DeleteBackend,
    DeleteDomain,
    DeleteService,
}

/// One compensating action and the resource it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoStep {
    DeleteBackend {
        service_id: String,
        version: u32,
        name: String,
    },
    DeleteDomain {
        service_id: String,
        version: u32,
        name: String,
    },
    /// Also clears the service ID persisted in the manifest.
    DeleteService { service_id: String },
}

impl UndoStep {
    #[must_use]
    pub fn kind(&self) -> UndoKind {
        match self {
            UndoStep::DeleteBackend { .. } => UndoKind::DeleteBackend,
            UndoStep::DeleteDomain { .. } => UndoKind::DeleteDomain,
            UndoStep::DeleteService { .. } => UndoKind::DeleteService,
        }
    }

    /// Identifier of the resource the step deletes.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            UndoStep::DeleteBackend { name, .. } | UndoStep::DeleteDomain { name, .. } => name,
            UndoStep::DeleteService { service_id } => service_id,
        }
    }
}

impl fmt::Display for UndoStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoStep::DeleteBackend { name, .. } => write!(f, "deleting backend '{name}'"),
            UndoStep::DeleteDomain { name, .. } => write!(f, "deleting domain '{name}'"),
            UndoStep::DeleteService { service_id } => write!(f, "deleting service '{service_id}'"),
        }
    }
}

/// LIFO stack of compensating actions.
#[derive(Debug, Default)]
pub struct UndoStack {
    steps: Vec<UndoStep>,
}

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reversal of a creation that has already succeeded.
    pub fn push(&mut self, step: UndoStep) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Empty the stack, returning steps newest-first.
    pub fn drain_reverse(&mut self) -> Vec<UndoStep> {
        let mut steps = std::mem::take(&mut self.steps);
        steps.reverse();
        steps
    }
}

/// Outcome of draining an [`UndoStack`].
#[derive(Debug, Default)]
pub struct RollbackReport {
    /// Every step attempted, in execution order.
    pub attempted: Vec<UndoStep>,
    /// Steps whose delete failed. Never retried.
    pub failures: Vec<RollbackError>,
    /// The persisted service ID was cleared after deleting a created service.
    pub service_id_cleared: bool,
}

impl RollbackReport {
    /// Suffix appended to the original error when some deletes failed.
    #[must_use]
    pub fn failure_note(&self) -> String {
        if self.failures.is_empty() {
            return String::new();
        }
        let mut note = format!(
            "\n\nrollback incomplete, {} of {} cleanup step(s) failed; these resources may need manual removal:",
            self.failures.len(),
            self.attempted.len()
        );
        for failure in &self.failures {
            note.push_str("\n  - ");
            note.push_str(&failure.to_string());
        }
        note
    }
}
