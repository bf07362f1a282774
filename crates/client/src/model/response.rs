//! Response bodies from the local model HTTP API.

use serde::Deserialize;

/// `GET /api/tags`: models present locally.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

impl TagsResponse {
    /// Whether `model` is installed. A name without a tag means `:latest`.
    pub fn contains(&self, model: &str) -> bool {
        let latest = format!("{model}:latest");
        self.models.iter().any(|m| m.name == model || m.name == latest)
    }
}

/// `POST /api/generate` with `stream: false`.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// `POST /api/pull` with `stream: false`.
#[derive(Debug, Deserialize)]
pub struct PullResponse {
    pub status: String,
}
