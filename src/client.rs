//! HTTP/WebSocket transport to the dashboard backend.
//!
//! [`DashboardClient`] is the only component that talks to the network. The
//! rest of the crate consumes it through two seams — [`ServiceListSource`]
//! for the poll loop and [`ActionTransport`] for lifecycle operations — so
//! tests can substitute deterministic fakes.

use crate::error::{Error, Result};
use crate::feed::ServiceListEntry;
use crate::status::OperationKind;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared HTTP client.
///
/// One connection pool across the poll loop and every operation request;
/// individual requests set their own timeouts.
static SHARED_HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> &'static Client {
    SHARED_HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to create shared HTTP client")
    })
}

/// Source of the polled service list.
#[async_trait]
pub trait ServiceListSource: Send + Sync {
    async fn fetch_services(&self) -> Result<Vec<ServiceListEntry>>;
}

/// Executor for lifecycle operations.
///
/// `service: None` means the fleet-wide form: one call covering all affected
/// services, same contract otherwise. Implementations own the entire network
/// exchange; admission control happens before they are invoked and state
/// cleanup after they return.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    async fn execute(&self, kind: OperationKind, service: Option<&str>) -> Result<()>;
}

/// Error body returned by the backend on a failed operation.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Client for the dashboard HTTP API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    client: Client,
}

impl DashboardClient {
    /// Create a client for the dashboard at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] unless the URL is http(s) with no
    /// trailing path.
    pub fn new(base_url: &str) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: shared_client().clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket URL of the streamed health channel.
    pub fn health_stream_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else {
            format!("ws://{}", self.base_url.trim_start_matches("http://"))
        };
        format!("{}/api/health/stream", ws_base)
    }

    /// Extract the user-facing failure message from a non-2xx response.
    async fn failure_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => match (body.error, body.details) {
                (Some(error), Some(details)) => format!("{}: {}", error, details),
                (Some(error), None) => error,
                _ => format!("HTTP {}", status),
            },
            Err(_) => format!("HTTP {}", status),
        }
    }
}

#[async_trait]
impl ServiceListSource for DashboardClient {
    async fn fetch_services(&self) -> Result<Vec<ServiceListEntry>> {
        let response = self
            .client
            .get(format!("{}/api/services", self.base_url))
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ActionTransport for DashboardClient {
    async fn execute(&self, kind: OperationKind, service: Option<&str>) -> Result<()> {
        let url = format!("{}/api/services/{}", self.base_url, kind.as_str());
        let mut request = self.client.post(url);
        if let Some(service) = service {
            request = request.query(&[("service", service)]);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(());
        }

        let message = Self::failure_message(response).await;
        match service {
            Some(service) => Err(Error::OperationFailed {
                service: service.to_string(),
                message,
            }),
            None => Err(Error::BulkOperationFailed {
                kind: kind.to_string(),
                message,
            }),
        }
    }
}

pub mod mock {
    //! Deterministic [`ActionTransport`] fake for tests.
    //!
    //! Records every call, optionally fails with a fixed message, and can be
    //! held open so tests can observe the transitional state while a request
    //! is in flight.

    use super::{ActionTransport, Error, OperationKind, Result};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    /// Recording transport that never touches the network.
    pub struct MockTransport {
        calls: Mutex<Vec<(OperationKind, Option<String>)>>,
        fail_message: Mutex<Option<String>>,
        gate: Semaphore,
        held: bool,
    }

    impl MockTransport {
        /// Transport that succeeds immediately.
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_message: Mutex::new(None),
                gate: Semaphore::new(0),
                held: false,
            })
        }

        /// Transport that fails every call with `message`.
        pub fn failing(message: &str) -> Arc<Self> {
            let transport = Self::new();
            *transport.fail_message.lock() = Some(message.to_string());
            transport
        }

        /// Transport that blocks each call until [`release`](Self::release).
        pub fn held() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_message: Mutex::new(None),
                gate: Semaphore::new(0),
                held: true,
            })
        }

        /// Allow one held call to proceed.
        pub fn release(&self) {
            self.gate.add_permits(1);
        }

        /// Every call executed so far, in order.
        pub fn calls(&self) -> Vec<(OperationKind, Option<String>)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ActionTransport for MockTransport {
        async fn execute(&self, kind: OperationKind, service: Option<&str>) -> Result<()> {
            if self.held {
                let permit = self
                    .gate
                    .acquire()
                    .await
                    .expect("mock transport gate closed");
                permit.forget();
            }
            self.calls
                .lock()
                .push((kind, service.map(|s| s.to_string())));
            match self.fail_message.lock().clone() {
                None => Ok(()),
                Some(message) => match service {
                    Some(service) => Err(Error::OperationFailed {
                        service: service.to_string(),
                        message,
                    }),
                    None => Err(Error::BulkOperationFailed {
                        kind: kind.to_string(),
                        message,
                    }),
                },
            }
        }
    }
}
