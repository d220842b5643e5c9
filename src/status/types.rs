use serde::{Deserialize, Serialize};
use std::fmt;

/// Supervisor-reported run state of a service.
///
/// The backend distinguishes standard networked services (which move through
/// `NotRunning` → `Starting` → `Running` → `Ready`) from process services —
/// daemons, watchers, build steps, and one-shot tasks — which report their own
/// vocabulary (`Watching`, `Building`, `Built`, `Completed`, `Failed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleStatus {
    /// Service has never been started or was fully torn down
    NotRunning,
    /// Service process is launching
    Starting,
    /// Process is up but readiness not yet confirmed
    Running,
    /// Process is up and reported ready
    Ready,
    /// Process service: watching for file changes
    Watching,
    /// Process service: build in progress
    Building,
    /// Process service: build finished successfully
    Built,
    /// Process service: one-shot task finished
    Completed,
    /// Shutdown in progress
    Stopping,
    /// Clean shutdown finished
    Stopped,
    /// Restart in progress
    Restarting,
    /// Process service exited unsuccessfully
    Failed,
    /// Supervisor-level error (spawn failure, crash)
    Error,
}

impl LifecycleStatus {
    /// Parse a wire string, folding anything unrecognized to [`NotRunning`].
    ///
    /// Feed payloads carry statuses as plain strings; a backend that grows a
    /// new status must degrade the display, not break it.
    ///
    /// [`NotRunning`]: LifecycleStatus::NotRunning
    pub fn parse_wire(raw: &str) -> Self {
        match raw {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "ready" => Self::Ready,
            "watching" => Self::Watching,
            "building" => Self::Building,
            "built" => Self::Built,
            "completed" => Self::Completed,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "restarting" => Self::Restarting,
            "failed" => Self::Failed,
            "error" => Self::Error,
            _ => Self::NotRunning,
        }
    }

    /// True for process-service states that map directly to a display status
    /// with no health refinement.
    pub fn is_process_state(&self) -> bool {
        matches!(
            self,
            Self::Watching | Self::Building | Self::Built | Self::Completed | Self::Failed
        )
    }

    /// True when the service is up and its display status should be derived
    /// from health rather than lifecycle.
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Running | Self::Ready)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotRunning => "not-running",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Ready => "ready",
            Self::Watching => "watching",
            Self::Building => "building",
            Self::Built => "built",
            Self::Completed => "completed",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Restarting => "restarting",
            Self::Failed => "failed",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of the backend's active probe against a running service.
///
/// `Starting` exists only on the wire: the probe reports it while a service
/// warms up, and normalization folds it to `Unknown` for display because it is
/// semantically distinct from lifecycle `Starting` and must not be conflated
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
    /// Wire-only transitional value; normalized to [`Unknown`](Self::Unknown)
    Starting,
}

impl HealthStatus {
    /// Parse a wire string, folding anything unrecognized to [`Unknown`].
    ///
    /// [`Unknown`]: HealthStatus::Unknown
    pub fn parse_wire(raw: &str) -> Self {
        match raw {
            "healthy" => Self::Healthy,
            "degraded" => Self::Degraded,
            "unhealthy" => Self::Unhealthy,
            "starting" => Self::Starting,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
            Self::Starting => "starting",
        };
        write!(f, "{}", s)
    }
}

/// A user-initiated lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Start,
    Stop,
    Restart,
}

impl OperationKind {
    /// URL path segment for the operation endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Transitional per-service state shown while this operation is in flight.
    pub fn pending_state(&self) -> OperationState {
        match self {
            Self::Start => OperationState::Starting,
            Self::Stop => OperationState::Stopping,
            Self::Restart => OperationState::Restarting,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-service in-flight operation state.
///
/// Exactly one non-idle value may exist per service at a time; the registry
/// enforces this by rejecting a second request outright rather than queueing
/// it. Returns to `Idle` on completion or failure — there is no terminal
/// "done" value because the confirmed outcome arrives through the feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationState {
    #[default]
    Idle,
    Starting,
    Stopping,
    Restarting,
}

impl OperationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
            Self::Restarting => "restarting",
        };
        write!(f, "{}", s)
    }
}

/// The single display-facing status every rendering surface consumes.
///
/// Never stored: always recomputed from the current
/// (lifecycle, health, operation) triple by [`resolve`](crate::status::resolve),
/// so no view can drift from the authoritative derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveStatus {
    // In-flight operation (highest precedence)
    Starting,
    Stopping,
    Restarting,
    // Process-service lifecycle
    Watching,
    Building,
    Built,
    Completed,
    Failed,
    // Terminal / transitional lifecycle
    Stopped,
    NotRunning,
    Error,
    // Health-derived (service up)
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

impl EffectiveStatus {
    /// Human-readable badge label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Starting => "Starting…",
            Self::Stopping => "Stopping…",
            Self::Restarting => "Restarting…",
            Self::Watching => "Watching",
            Self::Building => "Building",
            Self::Built => "Built",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
            Self::NotRunning => "Not running",
            Self::Error => "Error",
            Self::Healthy => "Healthy",
            Self::Degraded => "Degraded",
            Self::Unhealthy => "Unhealthy",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS class / theme key used by badge renderers.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Starting | Self::Stopping | Self::Restarting => "status-transitioning",
            Self::Watching | Self::Building => "status-active",
            Self::Built | Self::Completed | Self::Healthy => "status-ok",
            Self::Degraded => "status-degraded",
            Self::Failed | Self::Error | Self::Unhealthy => "status-error",
            Self::Stopped | Self::NotRunning => "status-stopped",
            Self::Unknown => "status-unknown",
        }
    }

    /// True while a start/stop/restart is in flight for the service.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Starting | Self::Stopping | Self::Restarting)
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
