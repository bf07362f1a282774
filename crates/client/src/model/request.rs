//! Request bodies for the local model HTTP API.

use serde::Serialize;

/// `POST /api/generate` body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Always false: the whole answer is awaited at once.
    pub stream: bool,
}

/// `POST /api/pull` body.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
}
