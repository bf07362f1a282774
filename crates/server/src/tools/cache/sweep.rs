//! cache_sweep tool implementation.
//!
//! Runs the expiry sweep on demand. The server also sweeps once at startup.

use crumbwise_core::cache::AnalysisCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_sweep tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSweepOutput {
    /// Number of expired entries removed.
    pub removed: usize,
}

/// Implementation of the cache_sweep tool.
pub async fn sweep_impl(cache: &AnalysisCache) -> Result<CallToolResult, McpError> {
    let removed = cache.sweep().await;
    json_result(&CacheSweepOutput { removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crumbwise_core::CookieRecord;
    use crumbwise_core::cache::MemoryStorage;
    use crumbwise_core::config::AppConfig;

    use crate::tools::result_json;

    #[tokio::test]
    async fn test_sweep_removes_expired() {
        let cache = AnalysisCache::from_config(&AppConfig::default(), Arc::new(MemoryStorage::new()));
        let cookies = vec![CookieRecord::new("sid", "example.com")];
        let now = chrono::Utc::now().timestamp_millis();

        let stale = cache.policy().write("old.com", &cookies, "old", 0);
        let fresh = cache.policy().write("new.com", &cookies, "new", now);
        cache.store().put(stale).await;
        cache.store().put(fresh).await;

        let json = result_json(&sweep_impl(&cache).await.unwrap());
        assert_eq!(json["removed"], 1);
        assert!(cache.store().get("new.com").await.is_some());
    }
}
