mod common;

use common::{list_entry, wait_until};
use service_dashboard::client::mock::MockTransport;
use service_dashboard::{OperationKind, OperationState, StatusStore};
use std::sync::Arc;

fn seeded_store(transport: Arc<MockTransport>, services: &[&str]) -> Arc<StatusStore> {
    let store = Arc::new(StatusStore::new(transport));
    store.merger().apply_service_list(
        services
            .iter()
            .map(|name| list_entry(name, "running"))
            .collect(),
    );
    store
}

#[tokio::test]
async fn pending_state_is_observable_before_settlement() {
    let transport = MockTransport::held();
    let store = seeded_store(transport.clone(), &["api"]);

    assert!(store.request_operation("api", OperationKind::Stop));
    // The transitional state is set synchronously at admission, before the
    // network call resolves.
    assert_eq!(
        store.effective_operation_state("api"),
        OperationState::Stopping
    );
    assert!(store.operation_in_progress("api"));

    transport.release();
    wait_until("operation settled", || !store.operation_in_progress("api")).await;
    assert_eq!(
        transport.calls(),
        vec![(OperationKind::Stop, Some("api".to_string()))]
    );
}

#[tokio::test]
async fn second_request_rejected_while_first_in_flight() {
    let transport = MockTransport::held();
    let store = seeded_store(transport.clone(), &["api"]);

    assert!(store.request_operation("api", OperationKind::Restart));
    // Second request before the first resolves: rejected, prior state kept.
    assert!(!store.request_operation("api", OperationKind::Stop));
    assert_eq!(
        store.effective_operation_state("api"),
        OperationState::Restarting
    );

    transport.release();
    wait_until("operation settled", || !store.operation_in_progress("api")).await;
    // Only the admitted operation reached the transport.
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn operations_on_different_services_are_independent() {
    let transport = MockTransport::held();
    let store = seeded_store(transport.clone(), &["api", "web"]);

    assert!(store.request_operation("api", OperationKind::Stop));
    // One service's in-flight operation never blocks another's.
    assert!(store.request_operation("web", OperationKind::Start));
    assert_eq!(
        store.effective_operation_state("api"),
        OperationState::Stopping
    );
    assert_eq!(
        store.effective_operation_state("web"),
        OperationState::Starting
    );

    transport.release();
    transport.release();
    wait_until("both operations settled", || {
        !store.operation_in_progress("api") && !store.operation_in_progress("web")
    })
    .await;
}

#[tokio::test]
async fn failure_resets_state_and_records_error() {
    let transport = MockTransport::failing("exit code 1");
    let store = seeded_store(transport, &["api"]);

    assert!(store.run_operation("api", OperationKind::Start).await);
    assert_eq!(store.effective_operation_state("api"), OperationState::Idle);
    let error = store.operation_error("api").expect("error recorded");
    assert!(error.contains("exit code 1"), "unexpected error: {}", error);

    // No automatic retry happened; exactly one call was made. A fresh
    // request is admitted and clears the stale error.
    assert!(store.run_operation("api", OperationKind::Start).await);
}

#[tokio::test]
async fn success_leaves_no_error() {
    let transport = MockTransport::new();
    let store = seeded_store(transport.clone(), &["api"]);

    assert!(store.run_operation("api", OperationKind::Restart).await);
    assert_eq!(store.operation_error("api"), None);
    assert_eq!(
        transport.calls(),
        vec![(OperationKind::Restart, Some("api".to_string()))]
    );
}
