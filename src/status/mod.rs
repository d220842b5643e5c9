//! Status vocabulary and the pure derivation pipeline.
//!
//! Three independently-arriving signals — supervisor lifecycle, probe health,
//! and in-flight user operations — are reconciled into one display status:
//!
//! ```text
//! raw lifecycle ─┐
//!                ├─ normalize ─► canonical pair ─┐
//! raw health ────┘                               ├─ resolve ─► EffectiveStatus
//! operation state ───────────────────────────────┘
//! ```
//!
//! Both functions are synchronous, pure, and total: they degrade to
//! `not-running` / `unknown` rather than failing, because a broken status
//! display is worse than an imprecise one.

mod normalize;
mod resolve;
mod types;

pub use normalize::normalize;
pub use resolve::resolve;
pub use types::{EffectiveStatus, HealthStatus, LifecycleStatus, OperationKind, OperationState};
