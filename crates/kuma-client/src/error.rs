//! Uptime Kuma client errors
//!
//! HTTP status codes are mapped onto variants in `common::check_status`.

use thiserror::Error;

/// Errors returned by `KumaClient` and `MockKumaClient`
#[derive(Debug, Error)]
pub enum KumaError {
    /// Transport failure (connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected status or undecodable body
    #[error("Uptime Kuma API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 401 or 403
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 404; for relation endpoints this means the parent is gone
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409; the collection changed underneath a replace
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 400 or 422, e.g. a child id the server does not know
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl KumaError {
    /// Whether the error came from the server rather than the transport
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            KumaError::Authentication(_)
                | KumaError::NotFound(_)
                | KumaError::Conflict(_)
                | KumaError::InvalidRequest(_)
        )
    }
}
