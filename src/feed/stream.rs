//! Streamed health channel consumer.
//!
//! Connection state machine:
//!
//! ```text
//! Disconnected ──► Connecting ──► Connected ──► (Error | Closed) ──► Connecting
//! ```
//!
//! Reconnects automatically with capped exponential backoff (base doubling up
//! to the cap, reset on a successful connect). Teardown is deterministic:
//! cancelling the token aborts any pending reconnect sleep and closes the
//! socket with a normal-closure frame, so view transitions never leak
//! connections.

use super::merger::FeedMerger;
use super::types::{HealthReportEvent, StreamEnvelope};
use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the streamed connection, exposed so views can render a
/// transient "disconnected" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Connection attempt or established stream failed; reconnect pending.
    Error,
    /// Server closed the stream; reconnect pending.
    Closed,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Compute the next reconnect delay: double, capped.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    std::cmp::min(current * 2, max)
}

/// Consumes the WebSocket health stream and feeds full reports to the merger.
pub struct HealthStream {
    url: String,
    merger: Arc<FeedMerger>,
    state: RwLock<ConnectionState>,
    cancel: CancellationToken,
    base_backoff: Duration,
    max_backoff: Duration,
}

impl HealthStream {
    pub fn new(
        url: String,
        merger: Arc<FeedMerger>,
        cancel: CancellationToken,
        base_backoff: Duration,
        max_backoff: Duration,
    ) -> Self {
        Self {
            url,
            merger,
            state: RwLock::new(ConnectionState::Disconnected),
            cancel,
            base_backoff,
            max_backoff,
        }
    }

    /// Current connection state (snapshot read).
    pub fn connection_state(&self) -> ConnectionState {
        *self.state.read()
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write();
        if *state != next {
            tracing::debug!(from = ?*state, to = ?next, "health stream state change");
            *state = next;
        }
    }

    /// Run until cancelled, reconnecting on error or server close.
    pub async fn run(self: Arc<Self>) {
        let mut delay = self.base_backoff;
        loop {
            if self.cancel.is_cancelled() {
                self.set_state(ConnectionState::Disconnected);
                return;
            }

            self.set_state(ConnectionState::Connecting);
            match connect_async(self.url.as_str()).await {
                Ok((socket, _response)) => {
                    self.set_state(ConnectionState::Connected);
                    delay = self.base_backoff;
                    let (mut write, mut read) = socket.split();

                    loop {
                        tokio::select! {
                            _ = self.cancel.cancelled() => {
                                let _ = write
                                    .send(Message::Close(Some(CloseFrame {
                                        code: CloseCode::Normal,
                                        reason: "view teardown".into(),
                                    })))
                                    .await;
                                self.set_state(ConnectionState::Disconnected);
                                return;
                            }
                            message = read.next() => match message {
                                Some(Ok(Message::Text(text))) => self.handle_event(&text),
                                Some(Ok(Message::Close(_))) | None => {
                                    self.set_state(ConnectionState::Closed);
                                    break;
                                }
                                Some(Ok(_)) => {
                                    // Ping/pong/binary frames carry no reports.
                                }
                                Some(Err(e)) => {
                                    tracing::debug!(error = %e, "health stream read failed");
                                    self.set_state(ConnectionState::Error);
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "health stream connect failed");
                    self.set_state(ConnectionState::Error);
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    self.set_state(ConnectionState::Disconnected);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_backoff(delay, self.max_backoff);
        }
    }

    /// Dispatch one stream event. Only `"health"` reports mutate state;
    /// heartbeats, per-service change notices, and unknown event types are
    /// skipped — the next full report supersedes them anyway.
    fn handle_event(&self, text: &str) {
        let envelope: StreamEnvelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable health stream event skipped");
                return;
            }
        };

        match envelope.kind.as_str() {
            "health" => match serde_json::from_str::<HealthReportEvent>(text) {
                Ok(report) => {
                    tracing::trace!(services = report.services.len(), "health report received");
                    self.merger.apply_health_report(report.services);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "malformed health report skipped");
                }
            },
            other => {
                tracing::trace!(kind = other, "non-report stream event skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::{LocalRuntime, ServiceListEntry};
    use crate::status::HealthStatus;

    fn stream_over(merger: Arc<FeedMerger>) -> Arc<HealthStream> {
        Arc::new(HealthStream::new(
            "ws://localhost:0/api/health/stream".to_string(),
            merger,
            CancellationToken::new(),
            Duration::from_secs(1),
            Duration::from_secs(30),
        ))
    }

    fn seeded_merger(names: &[&str]) -> Arc<FeedMerger> {
        let merger = Arc::new(FeedMerger::new());
        merger.apply_service_list(
            names
                .iter()
                .map(|name| ServiceListEntry {
                    name: name.to_string(),
                    language: None,
                    framework: None,
                    local: Some(LocalRuntime {
                        status: Some("running".to_string()),
                        ..Default::default()
                    }),
                })
                .collect(),
        );
        merger
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let max = Duration::from_secs(30);
        let mut delay = Duration::from_secs(1);
        let expected = [2u64, 4, 8, 16, 30, 30];
        for secs in expected {
            delay = next_backoff(delay, max);
            assert_eq!(delay, Duration::from_secs(secs));
        }
    }

    #[test]
    fn health_event_feeds_merger() {
        let merger = seeded_merger(&["api"]);
        let stream = stream_over(merger.clone());
        stream.handle_event(
            r#"{"type":"health","timestamp":"2024-01-01T00:00:00Z","services":[{"serviceName":"api","status":"degraded"}]}"#,
        );
        assert_eq!(merger.snapshot("api").unwrap().health, HealthStatus::Degraded);
    }

    #[test]
    fn non_report_events_are_ignored() {
        let merger = seeded_merger(&["api"]);
        let stream = stream_over(merger.clone());
        stream.handle_event(r#"{"type":"heartbeat","timestamp":"2024-01-01T00:00:00Z"}"#);
        stream.handle_event(
            r#"{"type":"health-change","service":"api","oldStatus":"healthy","newStatus":"unhealthy"}"#,
        );
        stream.handle_event(r#"{"type":"something-new","payload":42}"#);
        stream.handle_event("not json at all");
        // Health untouched by any of the above.
        assert_eq!(merger.snapshot("api").unwrap().health, HealthStatus::Unknown);
    }

    #[test]
    fn initial_state_is_disconnected() {
        let stream = stream_over(Arc::new(FeedMerger::new()));
        assert_eq!(stream.connection_state(), ConnectionState::Disconnected);
        assert!(!stream.connection_state().is_connected());
    }
}
