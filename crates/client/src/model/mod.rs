//! Local language model client.
//!
//! Talks to an Ollama-compatible server on the same machine, so cookie
//! names never leave the device.
//!
//! ### Availability
//!
//! - `GET /api/tags` unreachable: the model is **unavailable**
//! - configured model listed: **available**
//! - a pull started by this client still running: **downloading**
//! - otherwise: **downloadable** (a pull is needed first)
//!
//! ### Generation
//!
//! `POST /api/generate` with `stream: false`. The caller bounds the wait;
//! this client sets no timeout on generation or pulls.

pub mod error;
pub mod prompt;
pub mod request;
pub mod response;

pub use error::ModelError;
pub use prompt::build_prompt;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use crumbwise_core::cache::Generator;
use crumbwise_core::config::AppConfig;
use crumbwise_core::{CookieRecord, GenerationError};
use reqwest::header;
use serde::Serialize;

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "crumbwise/0.1";

/// Timeout for the availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// State of the configured model on the local server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Downloadable,
    Downloading,
    Unavailable,
}

/// Local model client configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Server base URL (default: http://127.0.0.1:11434).
    pub base_url: String,
    /// Model name, optionally with a tag.
    pub model: String,
    /// User-agent string (default: crumbwise/0.x).
    pub user_agent: String,
}

impl From<&AppConfig> for ModelConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.model_base_url.trim_end_matches('/').to_string(),
            model: config.model_name.clone(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Clears the in-flight pull flag however the pull ends.
struct PullGuard(Arc<AtomicBool>);

impl Drop for PullGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Local model client.
#[derive(Debug, Clone)]
pub struct LocalModel {
    http: reqwest::Client,
    config: ModelConfig,
    pulling: Arc<AtomicBool>,
}

impl LocalModel {
    /// Create a new client with the given configuration.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ModelError::Network(Arc::new(e)))?;

        Ok(Self { http, config, pulling: Arc::new(AtomicBool::new(false)) })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Probe the server for the configured model.
    pub async fn availability(&self) -> Availability {
        if self.pulling.load(Ordering::SeqCst) {
            return Availability::Downloading;
        }

        let tags = match self.fetch_tags().await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(base_url = %self.config.base_url, error = %e, "local model server unreachable");
                return Availability::Unavailable;
            }
        };

        if tags.contains(&self.config.model) {
            Availability::Available
        } else if self.pulling.load(Ordering::SeqCst) {
            Availability::Downloading
        } else {
            Availability::Downloadable
        }
    }

    async fn fetch_tags(&self) -> Result<response::TagsResponse, ModelError> {
        let resp = self
            .http
            .get(self.url("/api/tags"))
            .header(header::ACCEPT, "application/json")
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        Self::decode(resp).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ModelError> {
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::HttpError { status: status.as_u16(), body });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Download the configured model, waiting until the server finishes.
    ///
    /// While this runs, [`availability`](Self::availability) reports
    /// `Downloading`. A second concurrent pull returns immediately.
    pub async fn pull(&self) -> Result<(), ModelError> {
        if self.pulling.swap(true, Ordering::SeqCst) {
            tracing::debug!(model = %self.config.model, "pull already in progress");
            return Ok(());
        }
        let _guard = PullGuard(self.pulling.clone());

        let start = Instant::now();
        tracing::info!(model = %self.config.model, "pulling model");

        let resp = self
            .http
            .post(self.url("/api/pull"))
            .json(&request::PullRequest { model: &self.config.model, stream: false })
            .send()
            .await?;
        let pulled: response::PullResponse = Self::decode(resp).await?;

        tracing::info!(model = %self.config.model, status = %pulled.status, elapsed = ?start.elapsed(), "pull finished");
        Ok(())
    }

    async fn prompt(&self, prompt: &str) -> Result<String, ModelError> {
        let start = Instant::now();
        let resp = self
            .http
            .post(self.url("/api/generate"))
            .header(header::ACCEPT, "application/json")
            .json(&request::GenerateRequest { model: &self.config.model, prompt, stream: false })
            .send()
            .await?;

        let generated: response::GenerateResponse = Self::decode(resp).await?;
        tracing::debug!(elapsed = ?start.elapsed(), chars = generated.response.len(), "generation completed");
        Ok(generated.response)
    }
}

#[async_trait]
impl Generator for LocalModel {
    async fn generate(&self, cookies: &[CookieRecord]) -> Result<String, GenerationError> {
        match self.availability().await {
            Availability::Available => {}
            Availability::Unavailable => return Err(GenerationError::Unavailable),
            Availability::Downloadable => return Err(GenerationError::NeedsDownload),
            Availability::Downloading => return Err(GenerationError::Downloading),
        }

        let text = self.prompt(&build_prompt(cookies)).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
