//! Interval-driven consumption of the polled service list.
//!
//! The poll source has no connection state: a failed fetch is logged and
//! skipped, leaving the previous snapshot displayed, and the next tick retries
//! on schedule. Only a successful fetch replaces the service set.

use super::merger::FeedMerger;
use crate::client::ServiceListSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Drives `GET /api/services` on a fixed cadence into the merger.
pub struct PollLoop {
    source: Arc<dyn ServiceListSource>,
    merger: Arc<FeedMerger>,
    interval: Duration,
    cancel: CancellationToken,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn ServiceListSource>,
        merger: Arc<FeedMerger>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            merger,
            interval,
            cancel,
        }
    }

    /// Run until cancelled. The first fetch happens immediately; subsequent
    /// fetches follow the configured interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("poll loop stopped");
                    return;
                }
                _ = ticker.tick() => {
                    match self.source.fetch_services().await {
                        Ok(entries) => {
                            tracing::trace!(services = entries.len(), "service list fetched");
                            self.merger.apply_service_list(entries);
                        }
                        Err(e) => {
                            // Transient by assumption; the previous snapshot
                            // stays on display and the next tick retries.
                            tracing::debug!(error = %e, "service list fetch failed, keeping last snapshot");
                        }
                    }
                }
            }
        }
    }
}
