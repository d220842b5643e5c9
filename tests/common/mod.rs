#![allow(dead_code)]

use service_dashboard::feed::{HealthReportEntry, LocalRuntime, ServiceListEntry};
use std::time::Duration;

/// Build a service list entry with the given wire status.
pub fn list_entry(name: &str, status: &str) -> ServiceListEntry {
    ServiceListEntry {
        name: name.to_string(),
        language: None,
        framework: None,
        local: Some(LocalRuntime {
            status: Some(status.to_string()),
            ..Default::default()
        }),
    }
}

/// Build a health report entry with the given wire status.
pub fn health_entry(name: &str, status: &str) -> HealthReportEntry {
    HealthReportEntry {
        service_name: name.to_string(),
        status: status.to_string(),
        error: None,
    }
}

/// Poll `condition` until it holds, panicking after a bounded wait.
pub async fn wait_until(description: &str, condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {}", description);
}
