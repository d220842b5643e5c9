//! Canonicalization of raw feed signals.
//!
//! The two feeds arrive with backend ambiguity baked in: a service may be
//! missing from one source, statuses arrive as free-form strings, and the
//! probe's transitional `starting` health value collides in name (but not in
//! meaning) with lifecycle `starting`. Normalization absorbs all of that in
//! one pure, total function so everything downstream works on a canonical
//! pair.

use super::types::{HealthStatus, LifecycleStatus};

/// Normalize a raw (lifecycle, health) pair into its canonical form.
///
/// Total and infallible: absent inputs default to
/// (`NotRunning`, `Unknown`), and a probe-side `Starting` health value folds
/// into `Unknown` — it describes a warming-up probe, not a launching process,
/// and conflating it with lifecycle `Starting` would show services as
/// launching that were started long ago.
pub fn normalize(
    lifecycle: Option<LifecycleStatus>,
    health: Option<HealthStatus>,
) -> (LifecycleStatus, HealthStatus) {
    let lifecycle = lifecycle.unwrap_or(LifecycleStatus::NotRunning);
    let health = match health.unwrap_or(HealthStatus::Unknown) {
        HealthStatus::Starting => HealthStatus::Unknown,
        other => other,
    };
    (lifecycle, health)
}
