//! Live status feeds: the polled service list and the streamed health report.
//!
//! The two sources run at different cadences with different semantics — the
//! poll full-replaces the service set, the stream merges health by key — and
//! both publish into the [`FeedMerger`], the single auditable merge point.

mod merger;
mod poll;
mod stream;
mod types;

pub use merger::{FeedMerger, ServiceSnapshot};
pub use poll::PollLoop;
pub use stream::{ConnectionState, HealthStream};
pub use types::{HealthReportEntry, HealthReportEvent, LocalRuntime, ServiceListEntry, StreamEnvelope};
