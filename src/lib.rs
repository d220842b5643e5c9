//! # Service Dashboard Client
//!
//! Client-side status reconciliation for the local-development service
//! dashboard. Three independently-arriving signals — supervisor lifecycle
//! state, streamed health-check results, and user-initiated start/stop/restart
//! operations — are merged into one authoritative, consistently-derived
//! status per service, safe under concurrent use from many simultaneous
//! views.
//!
//! ## Architecture
//!
//! - [`status`]: the pure derivation pipeline (`normalize` + `resolve`).
//! - [`feed`]: the polled service list and streamed health report, merged by
//!   [`feed::FeedMerger`] with per-source semantics (full-replace vs
//!   merge-by-key).
//! - [`ops`]: admission-controlled operation state — at most one in-flight
//!   operation per service, at most one bulk operation process-wide.
//! - [`store`]: [`StatusStore`], the single owned container views consume.
//! - [`client`]: the HTTP/WebSocket transport to the dashboard backend.
//!
//! ## Quick Start
//!
//! ```no_run
//! use service_dashboard::{DashboardClient, StatusStore, OperationKind};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), service_dashboard::Error> {
//! let client = Arc::new(DashboardClient::new("http://localhost:4280")?);
//! let store = Arc::new(StatusStore::new(client.clone()));
//!
//! // Feed loops (poll + health stream) publish into store.merger().
//! // Views then read derived state and request operations:
//! let status = store.effective_status("api");
//! let accepted = store.request_operation("api", OperationKind::Restart);
//! # let _ = (status, accepted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Derivations are synchronous and pure, so every render reflects the latest
//! committed state instantly. The two admission entry points do their
//! check-and-set under a lock that is never held across an await; everything
//! else is a snapshot read. In-flight operation requests are never cancelled
//! by view teardown; feed connections are torn down deterministically via
//! `CancellationToken`.

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod ops;
pub mod status;
pub mod store;

pub use client::{ActionTransport, DashboardClient, ServiceListSource};
pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use feed::{ConnectionState, FeedMerger, HealthStream, PollLoop, ServiceSnapshot};
pub use ops::{BulkCoordinator, BulkOperation, OperationRegistry};
pub use status::{
    normalize, resolve, EffectiveStatus, HealthStatus, LifecycleStatus, OperationKind,
    OperationState,
};
pub use store::{ServiceOverview, StatusStore};
