//! Per-service in-flight operation tracking.
//!
//! The registry is admission control, not an executor: it decides whether an
//! operation may begin and records its transitional state, while the network
//! action itself is supplied by the caller. All mutation funnels through
//! [`try_begin`](OperationRegistry::try_begin) and
//! [`complete`](OperationRegistry::complete); every view reads through O(1)
//! snapshot queries that never block on in-flight work.

use crate::status::{OperationKind, OperationState};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct OperationEntry {
    state: OperationState,
    /// Last operation failure for this service, shown inline by views.
    /// Cleared when a new operation is admitted.
    error: Option<String>,
    requested_at: Option<DateTime<Utc>>,
}

/// Store of in-flight lifecycle operations, one slot per service.
///
/// Invariant: at most one non-idle state per service. A second request while
/// one is active is rejected outright — never queued — so no two transitions
/// for one service are ever concurrently in flight. The check-and-set happens
/// under a single lock acquisition and never spans an await, which is what
/// makes the invariant hold without further coordination.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    entries: Mutex<HashMap<String, OperationEntry>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to admit an operation for `service`.
    ///
    /// Returns `false` with no state change if the service already has a
    /// non-idle operation. On success the transitional state is set before
    /// this method returns, so callers observe the pending state immediately —
    /// not only after the underlying network call resolves.
    ///
    /// Rejection is a legitimate race between views (or with the backend),
    /// not a bug, which is why it is a `bool` and not an error.
    pub fn try_begin(&self, service: &str, kind: OperationKind) -> bool {
        let mut entries = self.entries.lock();
        let entry = entries.entry(service.to_string()).or_default();
        if !entry.state.is_idle() {
            tracing::debug!(service, %kind, current = %entry.state, "operation rejected: already in flight");
            return false;
        }
        entry.state = kind.pending_state();
        entry.error = None;
        entry.requested_at = Some(Utc::now());
        tracing::debug!(service, %kind, "operation admitted");
        true
    }

    /// Record the outcome of the in-flight operation for `service`.
    ///
    /// Resets the state to idle on both success and failure; a failure
    /// additionally records the per-service error string. There is no
    /// automatic retry.
    pub fn complete(&self, service: &str, outcome: Result<(), String>) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(service.to_string()).or_default();
        entry.state = OperationState::Idle;
        entry.requested_at = None;
        match outcome {
            Ok(()) => {
                entry.error = None;
                tracing::debug!(service, "operation completed");
            }
            Err(message) => {
                tracing::warn!(service, error = %message, "operation failed");
                entry.error = Some(message);
            }
        }
    }

    /// Current operation state for `service`; idle for unknown services.
    pub fn state_of(&self, service: &str) -> OperationState {
        self.entries
            .lock()
            .get(service)
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// True if `service` has a non-idle operation.
    pub fn in_progress(&self, service: &str) -> bool {
        !self.state_of(service).is_idle()
    }

    /// True if any service has a non-idle operation.
    pub fn any_in_progress(&self) -> bool {
        self.entries.lock().values().any(|e| !e.state.is_idle())
    }

    /// Last recorded failure for `service`, if any.
    pub fn error_of(&self, service: &str) -> Option<String> {
        self.entries
            .lock()
            .get(service)
            .and_then(|e| e.error.clone())
    }

    /// When the in-flight operation for `service` was requested.
    pub fn requested_at(&self, service: &str) -> Option<DateTime<Utc>> {
        self.entries
            .lock()
            .get(service)
            .and_then(|e| e.requested_at)
    }
}
