use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One entry from `GET /api/services`.
///
/// Statuses arrive as free-form strings and are normalized on ingest, so a
/// backend that grows a new status value degrades the display instead of
/// breaking deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceListEntry {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    /// Runtime state; absent for services that have never been started.
    #[serde(default)]
    pub local: Option<LocalRuntime>,
}

/// Runtime sub-record of a service list entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalRuntime {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub pid: Option<u32>,
}

/// One per-service result from a streamed health report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReportEntry {
    pub service_name: String,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Envelope for events on the health stream; only the tag is decoded up
/// front so unknown event types can be skipped instead of failing the stream.
#[derive(Debug, Deserialize)]
pub struct StreamEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Payload of a `"health"` event: the full report for the fleet.
#[derive(Debug, Deserialize)]
pub struct HealthReportEvent {
    #[serde(default)]
    pub services: Vec<HealthReportEntry>,
}
