//! The authoritative status container every view consumes.
//!
//! One explicitly-owned `StatusStore` is constructed at startup and handed to
//! every consuming surface — grid cards, table rows, the detail panel, log
//! pane headers. It owns the only mutable shared state (the operation
//! registry and the bulk singleton) plus the merged feed read-model, and it
//! funnels all mutation through two admission-controlled entry points.
//!
//! Reads are non-blocking snapshot reads. Admission is a single synchronous
//! check-and-set under one lock, never held across an await, which is what
//! makes the at-most-one-in-flight invariants enforceable without further
//! coordination.

use crate::client::ActionTransport;
use crate::feed::{FeedMerger, ServiceSnapshot};
use crate::ops::{BulkCoordinator, BulkOperation, OperationRegistry};
use crate::status::{normalize, resolve, EffectiveStatus, OperationKind, OperationState};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Display-ready row for one service, as rendered by tables and cards.
#[derive(Debug, Clone)]
pub struct ServiceOverview {
    pub snapshot: ServiceSnapshot,
    pub operation: OperationState,
    pub status: EffectiveStatus,
    /// When the in-flight individual operation was requested, for elapsed-time
    /// display next to the transitional badge.
    pub requested_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Reconciles feed snapshots, in-flight operations, and the bulk overlay into
/// one effective status per service.
pub struct StatusStore {
    merger: Arc<FeedMerger>,
    registry: OperationRegistry,
    bulk: BulkCoordinator,
    transport: Arc<dyn ActionTransport>,
    /// Serializes the individual and bulk admission checks against each
    /// other; snapshot reads never touch it.
    admission: Mutex<()>,
}

impl StatusStore {
    pub fn new(transport: Arc<dyn ActionTransport>) -> Self {
        Self {
            merger: Arc::new(FeedMerger::new()),
            registry: OperationRegistry::new(),
            bulk: BulkCoordinator::new(),
            transport,
            admission: Mutex::new(()),
        }
    }

    /// The feed read-model, shared with the poll loop and health stream.
    pub fn merger(&self) -> Arc<FeedMerger> {
        Arc::clone(&self.merger)
    }

    /// Effective display status for `service`, recomputed from current inputs
    /// on every call. Unseen services resolve from default inputs
    /// (not-running / unknown) plus any operation state.
    pub fn effective_status(&self, service: &str) -> EffectiveStatus {
        let snapshot = self.merger.snapshot(service);
        let (lifecycle, health) = normalize(
            snapshot.as_ref().map(|s| s.lifecycle),
            snapshot.as_ref().map(|s| s.health),
        );
        let operation = self.bulk.effective_state_with(&self.registry, service);
        resolve(lifecycle, health, operation)
    }

    /// Effective per-service operation state: individual if non-idle, else
    /// the bulk overlay, else idle.
    pub fn effective_operation_state(&self, service: &str) -> OperationState {
        self.bulk.effective_state_with(&self.registry, service)
    }

    /// True while `service` shows a transitional operation state (individual
    /// or bulk-derived). Views use this to disable action buttons.
    pub fn operation_in_progress(&self, service: &str) -> bool {
        !self.effective_operation_state(service).is_idle()
    }

    /// Kind of the active bulk operation, if one is running.
    pub fn active_bulk_kind(&self) -> Option<OperationKind> {
        self.bulk.active_kind()
    }

    /// The active bulk operation with its admission-time affected set, for
    /// banner display.
    pub fn active_bulk(&self) -> Option<BulkOperation> {
        self.bulk.active()
    }

    /// Last failure for an individual operation on `service`.
    pub fn operation_error(&self, service: &str) -> Option<String> {
        self.registry.error_of(service)
    }

    /// Aggregate error from the last failed bulk operation.
    pub fn bulk_error(&self) -> Option<String> {
        self.bulk.error()
    }

    /// Display rows for every known service, sorted by name.
    pub fn overview(&self) -> Vec<ServiceOverview> {
        self.merger
            .snapshots()
            .into_iter()
            .map(|snapshot| {
                let operation = self.effective_operation_state(&snapshot.name);
                let status = resolve(snapshot.lifecycle, snapshot.health, operation);
                let requested_at = self.registry.requested_at(&snapshot.name);
                let error = self.registry.error_of(&snapshot.name);
                ServiceOverview {
                    snapshot,
                    operation,
                    status,
                    requested_at,
                    error,
                }
            })
            .collect()
    }

    fn admit_individual(&self, service: &str, kind: OperationKind) -> bool {
        let _guard = self.admission.lock();
        if self.bulk.is_active() {
            tracing::debug!(service, %kind, "operation rejected: bulk operation active");
            return false;
        }
        self.registry.try_begin(service, kind)
    }

    /// Request a lifecycle operation and await its settlement.
    ///
    /// Returns the admission verdict only: `false` means rejected (service
    /// busy or bulk active) with no state change; `true` means the
    /// transitional state was set synchronously — before the network call —
    /// and has been reset to idle by the time this future resolves. Failure
    /// outcomes surface through [`operation_error`](Self::operation_error),
    /// never as a hard error here.
    pub async fn run_operation(&self, service: &str, kind: OperationKind) -> bool {
        if !self.admit_individual(service, kind) {
            return false;
        }
        let outcome = self
            .transport
            .execute(kind, Some(service))
            .await
            .map_err(|e| e.to_string());
        self.registry.complete(service, outcome);
        true
    }

    /// Fire-and-forget form of [`run_operation`](Self::run_operation): the
    /// admission verdict is returned immediately and the settled outcome
    /// updates the shared registry from a detached task — view teardown does
    /// not cancel it.
    pub fn request_operation(self: &Arc<Self>, service: &str, kind: OperationKind) -> bool {
        if !self.admit_individual(service, kind) {
            return false;
        }
        let store = Arc::clone(self);
        let service = service.to_string();
        tokio::spawn(async move {
            let outcome = store
                .transport
                .execute(kind, Some(&service))
                .await
                .map_err(|e| e.to_string());
            store.registry.complete(&service, outcome);
        });
        true
    }

    fn admit_bulk(&self, kind: OperationKind) -> bool {
        let _guard = self.admission.lock();
        let affected = self.merger.service_names();
        self.bulk.try_begin(kind, affected, &self.registry)
    }

    /// Request a fleet-wide operation and await its settlement.
    ///
    /// On admission the current service set is snapshotted as the affected
    /// set and every swept service immediately shows the bulk-derived
    /// transitional state. One fleet-wide call is issued; its failure aborts
    /// the whole operation, restores every affected service to idle, and
    /// records a single aggregate error. The singleton clears when the call
    /// settles, independent of per-service feed confirmation.
    pub async fn run_bulk(&self, kind: OperationKind) -> bool {
        if !self.admit_bulk(kind) {
            return false;
        }
        let outcome = self
            .transport
            .execute(kind, None)
            .await
            .map_err(|e| e.to_string());
        self.bulk.finish(outcome);
        true
    }

    /// Fire-and-forget form of [`run_bulk`](Self::run_bulk).
    pub fn request_bulk(self: &Arc<Self>, kind: OperationKind) -> bool {
        if !self.admit_bulk(kind) {
            return false;
        }
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = store
                .transport
                .execute(kind, None)
                .await
                .map_err(|e| e.to_string());
            store.bulk.finish(outcome);
        });
        true
    }
}
