//! crumbwise server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use crumbwise_client::{CookieJar, CookieSource, LocalModel, ModelConfig};
use crumbwise_core::cache::{AnalysisCache, KeyValueStorage, MemoryStorage, SqliteStorage};
use crumbwise_core::config::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(model = %config.model_name, ttl_ms = config.ttl_ms, "Starting crumbwise server on stdio transport");

    let storage: Arc<dyn KeyValueStorage> = match &config.db_path {
        Some(path) => Arc::new(SqliteStorage::open(path).await?),
        None => Arc::new(MemoryStorage::new()),
    };
    let cache = Arc::new(AnalysisCache::from_config(&config, storage));

    let removed = cache.sweep().await;
    tracing::info!(removed, "startup sweep finished");

    let model = LocalModel::new(ModelConfig::from(&config))?;
    let cookies = config
        .cookie_jar_path
        .as_ref()
        .map(|path| Arc::new(CookieJar::new(path.clone())) as Arc<dyn CookieSource>);

    let handler = handler::CrumbwiseServer::new(cache, model, cookies);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
