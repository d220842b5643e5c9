mod common;

use common::{health_entry, list_entry, wait_until};
use service_dashboard::client::mock::MockTransport;
use service_dashboard::{EffectiveStatus, OperationKind, OperationState, StatusStore};
use std::sync::Arc;

#[tokio::test]
async fn stop_click_over_stale_feed() {
    // Scenario: running + healthy + idle renders healthy; clicking Stop flips
    // the display to stopping synchronously even though the next poll still
    // reports running; backend confirmation then lands as stopped.
    let transport = MockTransport::held();
    let store = Arc::new(StatusStore::new(transport.clone()));
    store
        .merger()
        .apply_service_list(vec![list_entry("api", "running")]);
    store
        .merger()
        .apply_health_report(vec![health_entry("api", "healthy")]);

    assert_eq!(store.effective_status("api"), EffectiveStatus::Healthy);

    assert!(store.request_operation("api", OperationKind::Stop));
    assert_eq!(store.effective_status("api"), EffectiveStatus::Stopping);

    // The next poll is stale — it still says running — and must not win.
    store
        .merger()
        .apply_service_list(vec![list_entry("api", "running")]);
    assert_eq!(store.effective_status("api"), EffectiveStatus::Stopping);

    // Backend settles the request, then a poll confirms the shutdown.
    transport.release();
    wait_until("operation settled", || !store.operation_in_progress("api")).await;
    store
        .merger()
        .apply_service_list(vec![list_entry("api", "stopped")]);
    assert_eq!(store.effective_status("api"), EffectiveStatus::Stopped);
}

#[tokio::test]
async fn bulk_restart_overlays_status_for_all_services() {
    let transport = MockTransport::held();
    let store = Arc::new(StatusStore::new(transport.clone()));
    let names = ["api", "web", "worker", "scheduler", "mailer"];
    store
        .merger()
        .apply_service_list(names.iter().map(|n| list_entry(n, "running")).collect());

    assert!(store.request_bulk(OperationKind::Restart));
    for name in names {
        assert_eq!(store.effective_status(name), EffectiveStatus::Restarting);
    }
    assert!(!store.request_operation("api", OperationKind::Stop));

    transport.release();
    wait_until("bulk settled", || store.active_bulk_kind().is_none()).await;
}

#[tokio::test]
async fn unseen_service_resolves_from_defaults() {
    let store = StatusStore::new(MockTransport::new());
    assert_eq!(store.effective_status("ghost"), EffectiveStatus::NotRunning);
    assert_eq!(store.effective_operation_state("ghost"), OperationState::Idle);
}

#[tokio::test]
async fn process_service_status_ignores_health() {
    let store = StatusStore::new(MockTransport::new());
    store
        .merger()
        .apply_service_list(vec![list_entry("builder", "building")]);
    store
        .merger()
        .apply_health_report(vec![health_entry("builder", "unhealthy")]);
    // Health for the process service arrived but does not refine the status.
    assert_eq!(store.effective_status("builder"), EffectiveStatus::Building);
}

#[tokio::test]
async fn overview_combines_all_signals() {
    let transport = MockTransport::held();
    let store = Arc::new(StatusStore::new(transport.clone()));
    store.merger().apply_service_list(vec![
        list_entry("api", "running"),
        list_entry("task", "completed"),
    ]);
    store
        .merger()
        .apply_health_report(vec![health_entry("api", "degraded")]);
    assert!(store.request_operation("api", OperationKind::Restart));

    let overview = store.overview();
    assert_eq!(overview.len(), 2);
    // Sorted by name: api first.
    assert_eq!(overview[0].snapshot.name, "api");
    assert_eq!(overview[0].status, EffectiveStatus::Restarting);
    assert_eq!(overview[0].operation, OperationState::Restarting);
    // Request time rides along while the operation is in flight.
    assert!(overview[0].requested_at.is_some());
    assert_eq!(overview[1].snapshot.name, "task");
    assert_eq!(overview[1].status, EffectiveStatus::Completed);
    assert!(overview[1].requested_at.is_none());

    transport.release();
    wait_until("operation settled", || !store.operation_in_progress("api")).await;
    let settled = store.overview();
    assert!(settled[0].requested_at.is_none());
}

#[tokio::test]
async fn detached_request_settles_after_caller_moves_on() {
    // View teardown does not cancel an in-flight request: the detached task
    // still updates the shared registry once the transport settles.
    let transport = MockTransport::held();
    let store = Arc::new(StatusStore::new(transport.clone()));
    store
        .merger()
        .apply_service_list(vec![list_entry("api", "running")]);

    assert!(store.request_operation("api", OperationKind::Stop));
    // Simulate the requesting view going away: nothing awaits the request.
    transport.release();
    wait_until("registry updated by detached task", || {
        !store.operation_in_progress("api")
    })
    .await;
    assert_eq!(
        transport.calls(),
        vec![(OperationKind::Stop, Some("api".to_string()))]
    );
}
