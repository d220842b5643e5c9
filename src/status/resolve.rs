//! Derivation of the one status every view renders.
//!
//! Four precedence rules, each short-circuiting. The ordering is load-bearing:
//! an in-flight operation must win over everything the feeds report, because
//! the feeds are necessarily stale the instant the user acts — swapping rules
//! (1) and (2) would show "Building" seconds after the user clicked Stop.

use super::types::{EffectiveStatus, HealthStatus, LifecycleStatus, OperationState};

/// Resolve (lifecycle, health, operation) into the effective display status.
///
/// Pure and infallible; called on every signal change, never cached.
///
/// Precedence:
/// 1. A non-idle operation state wins outright.
/// 2. Process-service lifecycle values map directly, no health refinement.
/// 3. Terminal and transitional lifecycle values map directly.
/// 4. Otherwise the service is up and status is derived from health.
pub fn resolve(
    lifecycle: LifecycleStatus,
    health: HealthStatus,
    operation: OperationState,
) -> EffectiveStatus {
    // Rule 1: in-flight operation
    match operation {
        OperationState::Starting => return EffectiveStatus::Starting,
        OperationState::Stopping => return EffectiveStatus::Stopping,
        OperationState::Restarting => return EffectiveStatus::Restarting,
        OperationState::Idle => {}
    }

    // Rule 2: process-service lifecycle
    match lifecycle {
        LifecycleStatus::Watching => return EffectiveStatus::Watching,
        LifecycleStatus::Building => return EffectiveStatus::Building,
        LifecycleStatus::Built => return EffectiveStatus::Built,
        LifecycleStatus::Completed => return EffectiveStatus::Completed,
        LifecycleStatus::Failed => return EffectiveStatus::Failed,
        _ => {}
    }

    // Rule 3: terminal / transitional lifecycle
    match lifecycle {
        LifecycleStatus::Stopped => return EffectiveStatus::Stopped,
        LifecycleStatus::NotRunning => return EffectiveStatus::NotRunning,
        LifecycleStatus::Stopping => return EffectiveStatus::Stopping,
        LifecycleStatus::Starting => return EffectiveStatus::Starting,
        LifecycleStatus::Restarting => return EffectiveStatus::Restarting,
        LifecycleStatus::Error => return EffectiveStatus::Error,
        _ => {}
    }

    // Rule 4: service is up (running/ready), refine with health
    debug_assert!(lifecycle.is_up());
    match health {
        HealthStatus::Healthy => EffectiveStatus::Healthy,
        HealthStatus::Degraded => EffectiveStatus::Degraded,
        HealthStatus::Unhealthy => EffectiveStatus::Unhealthy,
        // Starting reaches here only if the caller skipped normalization;
        // treat it the same way normalization would.
        HealthStatus::Unknown | HealthStatus::Starting => EffectiveStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_LIFECYCLES: [LifecycleStatus; 13] = [
        LifecycleStatus::NotRunning,
        LifecycleStatus::Starting,
        LifecycleStatus::Running,
        LifecycleStatus::Ready,
        LifecycleStatus::Watching,
        LifecycleStatus::Building,
        LifecycleStatus::Built,
        LifecycleStatus::Completed,
        LifecycleStatus::Stopping,
        LifecycleStatus::Stopped,
        LifecycleStatus::Restarting,
        LifecycleStatus::Failed,
        LifecycleStatus::Error,
    ];

    const ALL_HEALTH: [HealthStatus; 5] = [
        HealthStatus::Healthy,
        HealthStatus::Degraded,
        HealthStatus::Unhealthy,
        HealthStatus::Unknown,
        HealthStatus::Starting,
    ];

    #[test]
    fn in_flight_operation_wins_over_any_feed_state() {
        // Changing lifecycle or health while an operation is in flight must
        // not change the resolved status.
        for lifecycle in ALL_LIFECYCLES {
            for health in ALL_HEALTH {
                assert_eq!(
                    resolve(lifecycle, health, OperationState::Stopping),
                    EffectiveStatus::Stopping
                );
                assert_eq!(
                    resolve(lifecycle, health, OperationState::Starting),
                    EffectiveStatus::Starting
                );
                assert_eq!(
                    resolve(lifecycle, health, OperationState::Restarting),
                    EffectiveStatus::Restarting
                );
            }
        }
    }

    #[test]
    fn transitioning_flag_marks_operation_states_only() {
        for status in [
            EffectiveStatus::Starting,
            EffectiveStatus::Stopping,
            EffectiveStatus::Restarting,
        ] {
            assert!(status.is_transitioning());
        }
        for status in [
            EffectiveStatus::Healthy,
            EffectiveStatus::Building,
            EffectiveStatus::Stopped,
            EffectiveStatus::Unknown,
        ] {
            assert!(!status.is_transitioning());
        }
    }

    #[test]
    fn process_states_ignore_health() {
        for health in ALL_HEALTH {
            assert_eq!(
                resolve(LifecycleStatus::Building, health, OperationState::Idle),
                EffectiveStatus::Building
            );
            assert_eq!(
                resolve(LifecycleStatus::Watching, health, OperationState::Idle),
                EffectiveStatus::Watching
            );
            assert_eq!(
                resolve(LifecycleStatus::Failed, health, OperationState::Idle),
                EffectiveStatus::Failed
            );
        }
    }

    #[test]
    fn process_states_beat_stale_operation_only_when_idle() {
        // A stale "building" from the poll must not outrank a live Stop.
        assert_eq!(
            resolve(
                LifecycleStatus::Building,
                HealthStatus::Unknown,
                OperationState::Stopping
            ),
            EffectiveStatus::Stopping
        );
    }

    #[test]
    fn terminal_lifecycle_maps_directly() {
        let cases = [
            (LifecycleStatus::Stopped, EffectiveStatus::Stopped),
            (LifecycleStatus::NotRunning, EffectiveStatus::NotRunning),
            (LifecycleStatus::Stopping, EffectiveStatus::Stopping),
            (LifecycleStatus::Starting, EffectiveStatus::Starting),
            (LifecycleStatus::Restarting, EffectiveStatus::Restarting),
            (LifecycleStatus::Error, EffectiveStatus::Error),
        ];
        for (lifecycle, expected) in cases {
            // Health must not leak into these mappings.
            assert_eq!(
                resolve(lifecycle, HealthStatus::Healthy, OperationState::Idle),
                expected
            );
        }
    }

    #[test]
    fn up_services_derive_from_health() {
        for lifecycle in [LifecycleStatus::Running, LifecycleStatus::Ready] {
            assert_eq!(
                resolve(lifecycle, HealthStatus::Healthy, OperationState::Idle),
                EffectiveStatus::Healthy
            );
            assert_eq!(
                resolve(lifecycle, HealthStatus::Degraded, OperationState::Idle),
                EffectiveStatus::Degraded
            );
            assert_eq!(
                resolve(lifecycle, HealthStatus::Unhealthy, OperationState::Idle),
                EffectiveStatus::Unhealthy
            );
            assert_eq!(
                resolve(lifecycle, HealthStatus::Unknown, OperationState::Idle),
                EffectiveStatus::Unknown
            );
        }
    }

    #[test]
    fn total_over_full_input_product() {
        for lifecycle in ALL_LIFECYCLES {
            for health in ALL_HEALTH {
                for operation in [
                    OperationState::Idle,
                    OperationState::Starting,
                    OperationState::Stopping,
                    OperationState::Restarting,
                ] {
                    // Must never panic; label/css must exist for every output.
                    let status = resolve(lifecycle, health, operation);
                    assert!(!status.label().is_empty());
                    assert!(!status.css_class().is_empty());
                }
            }
        }
    }
}
