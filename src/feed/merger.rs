//! The two-source read-model behind every status query.
//!
//! Lifecycle arrives from the poll loop with full-replace semantics; health
//! arrives from the stream with merge-by-key semantics. The merger keeps the
//! latest value from each source without requiring them to agree on timing —
//! updates are applied in arrival order per source, last-arrived-wins, with no
//! payload-timestamp reconciliation.

use super::types::{HealthReportEntry, LocalRuntime, ServiceListEntry};
use crate::status::{normalize, HealthStatus, LifecycleStatus};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Latest known per-service state, merged from both feeds.
#[derive(Debug, Clone)]
pub struct ServiceSnapshot {
    pub name: String,
    pub lifecycle: LifecycleStatus,
    pub health: HealthStatus,
    pub runtime: LocalRuntime,
    pub lifecycle_updated_at: DateTime<Utc>,
    /// None until the first health report mentions this service.
    pub health_updated_at: Option<DateTime<Utc>>,
}

/// Merges the polled service list and the streamed health report into one
/// snapshot map. Reads are cloned out so no lock is held while rendering.
#[derive(Debug, Default)]
pub struct FeedMerger {
    snapshots: RwLock<HashMap<String, ServiceSnapshot>>,
}

impl FeedMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fresh service list (full-replace semantics).
    ///
    /// Services absent from the list are removed. Retained services keep
    /// their last known health — the list is the lifecycle source, not the
    /// health source.
    pub fn apply_service_list(&self, entries: Vec<ServiceListEntry>) {
        let now = Utc::now();
        let mut snapshots = self.snapshots.write();
        let mut next: HashMap<String, ServiceSnapshot> = HashMap::with_capacity(entries.len());

        for entry in entries {
            let runtime = entry.local.unwrap_or_default();
            let raw_lifecycle = runtime.status.as_deref().map(LifecycleStatus::parse_wire);
            let previous = snapshots.remove(&entry.name);
            let carried_health = previous.as_ref().map(|p| p.health);
            let (lifecycle, health) = normalize(raw_lifecycle, carried_health);

            next.insert(
                entry.name.clone(),
                ServiceSnapshot {
                    name: entry.name,
                    lifecycle,
                    health,
                    runtime,
                    lifecycle_updated_at: now,
                    health_updated_at: previous.and_then(|p| p.health_updated_at),
                },
            );
        }

        if !snapshots.is_empty() {
            tracing::debug!(removed = snapshots.len(), "services dropped from poll");
        }
        *snapshots = next;
    }

    /// Apply a streamed health report (merge-by-key semantics).
    ///
    /// Services absent from the report keep their last known health rather
    /// than reverting to unknown. Names the poll has not announced are
    /// ignored — the service list is the sole authority on the service set.
    pub fn apply_health_report(&self, entries: Vec<HealthReportEntry>) {
        let now = Utc::now();
        let mut snapshots = self.snapshots.write();
        for entry in entries {
            match snapshots.get_mut(&entry.service_name) {
                Some(snapshot) => {
                    let raw = HealthStatus::parse_wire(&entry.status);
                    let (_, health) = normalize(Some(snapshot.lifecycle), Some(raw));
                    snapshot.health = health;
                    snapshot.health_updated_at = Some(now);
                }
                None => {
                    tracing::debug!(service = %entry.service_name, "health report for unknown service ignored");
                }
            }
        }
    }

    /// Latest snapshot for one service.
    pub fn snapshot(&self, service: &str) -> Option<ServiceSnapshot> {
        self.snapshots.read().get(service).cloned()
    }

    /// Latest snapshots for every known service, sorted by name for stable
    /// rendering order.
    pub fn snapshots(&self) -> Vec<ServiceSnapshot> {
        let mut all: Vec<_> = self.snapshots.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Names of every known service, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.snapshots.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}
