//! Unified error types for crumbwise.
//!
//! Storage failures are recovered inside the cache and only surface here when
//! a caller talks to a backend directly. Generation failures always propagate
//! to whoever asked for an analysis.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// User-facing text for a model that cannot run on this device.
pub const MSG_UNAVAILABLE: &str =
    "The on-device language model isn't available. Check that the local model server is installed and running.";

/// User-facing text for a model that has to be downloaded first.
pub const MSG_NEEDS_DOWNLOAD: &str = "The language model needs to download first. Please wait and try again.";

/// User-facing text for a model download still in progress.
pub const MSG_DOWNLOADING: &str = "The language model is downloading. Please wait and try again.";

/// User-facing text for a model that answered with nothing.
pub const MSG_EMPTY_RESPONSE: &str = "The language model didn't respond. Please try again.";

/// Prefix for every error without a dedicated message.
pub const MSG_GENERIC_PREFIX: &str = "Something went wrong. ";

/// Failures of the external text generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No model can run here at all.
    #[error("language model unavailable")]
    Unavailable,

    /// The model exists but must be downloaded before use.
    #[error("language model needs download")]
    NeedsDownload,

    /// A download of the model is in flight.
    #[error("language model downloading")]
    Downloading,

    /// The model returned empty or whitespace-only text.
    #[error("language model returned an empty response")]
    EmptyResponse,

    /// The generator did not answer within the configured bound.
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other failure reported by the generator.
    #[error("{0}")]
    Failed(String),
}

/// Unified error types for crumbwise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., no URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A tab URL that cannot be parsed into a domain.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Reading the persisted cache failed.
    #[error("STORAGE_READ: {0}")]
    StorageRead(String),

    /// The persisted value exists but is not valid JSON.
    #[error("CORRUPT_VALUE: {0}")]
    CorruptValue(String),

    /// Writing the persisted cache failed.
    #[error("STORAGE_WRITE: {0}")]
    StorageWrite(String),

    /// Database operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cookie enumeration failed.
    #[error("COOKIE_SOURCE: {0}")]
    CookieSource(String),

    /// The language model could not produce an analysis.
    #[error("GENERATION_FAILED: {0}")]
    Generation(#[from] GenerationError),
}

impl Error {
    /// Text suitable for an error panel.
    ///
    /// The four generation sub-kinds have fixed messages; everything else is
    /// the generic prefix followed by the underlying message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Generation(GenerationError::Unavailable) => MSG_UNAVAILABLE.to_string(),
            Error::Generation(GenerationError::NeedsDownload) => MSG_NEEDS_DOWNLOAD.to_string(),
            Error::Generation(GenerationError::Downloading) => MSG_DOWNLOADING.to_string(),
            Error::Generation(GenerationError::EmptyResponse) => MSG_EMPTY_RESPONSE.to_string(),
            Error::Generation(other) => format!("{MSG_GENERIC_PREFIX}{other}"),
            other => format!("{MSG_GENERIC_PREFIX}{other}"),
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::Generation(GenerationError::Unavailable) => -32010,
            Error::Generation(GenerationError::NeedsDownload) => -32011,
            Error::Generation(GenerationError::Downloading) => -32012,
            Error::Generation(GenerationError::EmptyResponse) => -32013,
            Error::Generation(GenerationError::TimedOut(_)) => -32014,
            Error::Generation(GenerationError::Failed(_)) => -32015,
            Error::CookieSource(_) => -32020,
            Error::StorageRead(_)
            | Error::CorruptValue(_)
            | Error::StorageWrite(_)
            | Error::Database(_)
            | Error::MigrationFailed(_) => -32002,
        };

        McpError { code: ErrorCode(code), message: err.user_message().into(), data: None }
    }
}
