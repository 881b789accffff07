//! Error types for service client operations.

use thiserror::Error;

/// Errors that can occur while talking to an external service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Service returned an error response (4xx other than 401/403/404, 5xx).
    #[error("Service error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error (bad URL, missing catalog entry, etc.).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}
