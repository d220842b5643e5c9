use crate::output::UserOutput;
use service_dashboard::{
    DashboardClient, DashboardConfig, Error, OperationKind, ServiceListSource, StatusStore,
};
use std::sync::Arc;

/// Run one lifecycle operation to completion: a single service when named,
/// otherwise the fleet-wide form.
pub async fn run_lifecycle(
    config: &DashboardConfig,
    kind: OperationKind,
    service: Option<String>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let client = Arc::new(DashboardClient::new(&config.base_url)?);
    let store = StatusStore::new(client.clone());

    // Seed the service set so the bulk snapshot has the real fleet and a
    // named service can be validated before the POST.
    let entries = client.fetch_services().await?;
    store.merger().apply_service_list(entries);

    match service {
        Some(service) => {
            let known = store.merger().service_names();
            if !known.iter().any(|name| name == &service) {
                return Err(Error::ServiceNotFound(service).into());
            }

            out.status(&format!("Requesting {} for '{}'...", kind, service));
            if !store.run_operation(&service, kind).await {
                out.warning(&format!(
                    "An operation is already in progress for '{}'",
                    service
                ));
                return Ok(());
            }
            match store.operation_error(&service) {
                None => out.success(&format!("Service '{}' {} request completed", service, kind)),
                Some(message) => {
                    return Err(Error::OperationFailed { service, message }.into());
                }
            }
        }
        None => {
            if store.merger().is_empty() {
                out.status(&format!("No services to {}", kind));
                return Ok(());
            }
            out.status(&format!("Requesting {} for all services...", kind));
            if !store.run_bulk(kind).await {
                out.warning("Another operation is already in progress");
                return Ok(());
            }
            match store.bulk_error() {
                None => out.success(&format!("Bulk {} request completed", kind)),
                Some(message) => {
                    return Err(Error::BulkOperationFailed {
                        kind: kind.to_string(),
                        message,
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}
