//! cache_clear tool implementation.
//!
//! Drops the cached analysis of one domain, or every cached analysis.

use crumbwise_core::cache::AnalysisCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {
    /// Domain to clear. When omitted the whole cache is cleared.
    #[serde(default)]
    pub domain: Option<String>,
}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// The cleared domain, or `null` for the whole cache.
    pub domain: Option<String>,
    /// Whether anything was deleted. `false` for a domain with no entry or
    /// when the storage write failed.
    pub cleared: bool,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(cache: &AnalysisCache, params: CacheClearParams) -> Result<CallToolResult, McpError> {
    let domain = params
        .domain
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty());

    let cleared = match &domain {
        Some(domain) => cache.clear_domain(domain).await,
        None => cache.clear_all().await,
    };

    tracing::info!(domain = domain.as_deref().unwrap_or("*"), cleared, "cache cleared");
    json_result(&CacheClearOutput { domain, cleared })
}
