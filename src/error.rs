use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(sdash::config::error))]
    Config(String),

    #[error("Invalid dashboard URL: {0}")]
    #[diagnostic(
        code(sdash::config::invalid_url),
        help("The dashboard URL must be http:// or https://, e.g. http://localhost:4280")
    )]
    InvalidUrl(String),

    #[error("Dashboard request failed: {0}")]
    #[diagnostic(
        code(sdash::transport::http),
        help("Check that the dashboard is running and reachable at the configured URL")
    )]
    Http(#[from] reqwest::Error),

    #[error("Service '{service}' operation failed: {message}")]
    #[diagnostic(code(sdash::operation::failed))]
    OperationFailed { service: String, message: String },

    #[error("Bulk {kind} failed: {message}")]
    #[diagnostic(
        code(sdash::operation::bulk_failed),
        help("No individual service state was changed; retry once the backend recovers")
    )]
    BulkOperationFailed { kind: String, message: String },

    #[error("Service not found: {0}")]
    #[diagnostic(
        code(sdash::service::not_found),
        help("Check available services with `sdash status`")
    )]
    ServiceNotFound(String),
}

impl Error {
    /// Returns a helpful suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::InvalidUrl(_) => Some(
                "Pass --url http://localhost:<port> or set SDASH_DASHBOARD_URL".to_string(),
            ),
            Error::Http(_) => Some(
                "Check that the dashboard is running, then retry. Status views keep their \
                 last known state across transient failures."
                    .to_string(),
            ),
            Error::ServiceNotFound(name) => Some(format!(
                "Run 'sdash status' to list known services. Did you mean a different name than '{}'?",
                name
            )),
            Error::OperationFailed { service, .. } => Some(format!(
                "Check the logs for '{}' in the dashboard, then retry the operation.",
                service
            )),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
