//! Local model client error types.

use std::sync::Arc;

use crumbwise_core::GenerationError;

/// Errors from the local model HTTP API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// The model server could not be reached.
    #[error("connection failed: {0}")]
    Connect(Arc<reqwest::Error>),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// HTTP error response.
    #[error("HTTP error: {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Network error after the connection was established.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout
        } else if err.is_connect() {
            ModelError::Connect(Arc::new(err))
        } else {
            ModelError::Network(Arc::new(err))
        }
    }
}

impl From<ModelError> for GenerationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Connect(_) => GenerationError::Unavailable,
            other => GenerationError::Failed(other.to_string()),
        }
    }
}
