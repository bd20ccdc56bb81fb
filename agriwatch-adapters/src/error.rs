//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when talking to the external collaborators.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The upstream service answered with a non-2xx status.
    ///
    /// Carries the status code and the raw response body so callers can
    /// surface the upstream failure unchanged.
    #[error("Upstream returned status {status}")]
    Upstream { status: u16, body: String },
}

impl AdapterError {
    /// The upstream HTTP status, when one was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AdapterError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
