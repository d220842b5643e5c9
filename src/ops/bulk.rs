//! Fleet-wide lifecycle operation coordination.
//!
//! A bulk start/stop/restart is one backend call covering every affected
//! service, not N individual calls. While it is active the coordinator
//! overlays a synthetic transitional state onto every swept service — a
//! computed view, never written into the real per-service registry, which
//! keeps the registry's one-in-flight invariant trivially checkable.

use super::registry::OperationRegistry;
use crate::status::{OperationKind, OperationState};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// The process-wide bulk operation singleton.
#[derive(Debug, Clone)]
pub struct BulkOperation {
    pub kind: OperationKind,
    pub started_at: DateTime<Utc>,
    /// Snapshot of the service set taken at admission time. Services that
    /// appear afterwards are not swept and get no overlay.
    pub affected: Vec<String>,
}

#[derive(Debug, Default)]
struct BulkState {
    active: Option<BulkOperation>,
    /// Single aggregate error from the last failed bulk operation; there are
    /// deliberately no per-service errors for a bulk failure.
    error: Option<String>,
}

/// Coordinator for the at-most-one bulk operation.
#[derive(Debug, Default)]
pub struct BulkCoordinator {
    state: Mutex<BulkState>,
}

impl BulkCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to admit a fleet-wide operation over `affected`.
    ///
    /// Rejected if a bulk operation is already active or any individual
    /// operation is in flight anywhere. On success the singleton is set
    /// before returning, so every view observes the overlay immediately.
    pub fn try_begin(
        &self,
        kind: OperationKind,
        affected: Vec<String>,
        registry: &OperationRegistry,
    ) -> bool {
        let mut state = self.state.lock();
        if state.active.is_some() {
            tracing::debug!(%kind, "bulk operation rejected: bulk already active");
            return false;
        }
        if registry.any_in_progress() {
            tracing::debug!(%kind, "bulk operation rejected: individual operation in flight");
            return false;
        }
        tracing::debug!(%kind, services = affected.len(), "bulk operation admitted");
        state.error = None;
        state.active = Some(BulkOperation {
            kind,
            started_at: Utc::now(),
            affected,
        });
        true
    }

    /// Clear the singleton when the fleet-wide call settles.
    ///
    /// On failure every affected service is implicitly restored to idle —
    /// nothing was ever written into the registry — and the single aggregate
    /// error is retained for display. Settled means the backend responded;
    /// per-service lifecycle confirmation arrives later through the feeds.
    pub fn finish(&self, outcome: Result<(), String>) {
        let mut state = self.state.lock();
        match &outcome {
            Ok(()) => tracing::debug!("bulk operation settled"),
            Err(message) => tracing::warn!(error = %message, "bulk operation failed"),
        }
        state.error = outcome.err();
        state.active = None;
    }

    /// True while a bulk operation is active.
    pub fn is_active(&self) -> bool {
        self.state.lock().active.is_some()
    }

    /// Kind of the active bulk operation, if any.
    pub fn active_kind(&self) -> Option<OperationKind> {
        self.state.lock().active.as_ref().map(|b| b.kind)
    }

    /// Snapshot of the active bulk operation, if any.
    pub fn active(&self) -> Option<BulkOperation> {
        self.state.lock().active.clone()
    }

    /// Aggregate error from the last failed bulk operation.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Effective per-service operation state: the individual state when
    /// non-idle, else the bulk-derived transitional state for swept services,
    /// else idle.
    pub fn effective_state_with(
        &self,
        registry: &OperationRegistry,
        service: &str,
    ) -> OperationState {
        let individual = registry.state_of(service);
        if !individual.is_idle() {
            return individual;
        }
        let state = self.state.lock();
        match &state.active {
            Some(bulk) if bulk.affected.iter().any(|s| s == service) => bulk.kind.pending_state(),
            _ => OperationState::Idle,
        }
    }
}
