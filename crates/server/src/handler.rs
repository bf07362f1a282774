//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::tools::cache::{CacheClearParams, clear_impl, stats_impl, sweep_impl};
use crate::tools::{CookieAnalyzeParams, analyze_impl, pull_impl};

use crumbwise_client::{CookieSource, LocalModel};
use crumbwise_core::cache::{AnalysisCache, Generator};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for crumbwise.
#[derive(Clone)]
pub struct CrumbwiseServer {
    tool_router: ToolRouter<Self>,
    cache: Arc<AnalysisCache>,
    model: LocalModel,
    cookies: Option<Arc<dyn CookieSource>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl CrumbwiseServer {
    /// Create a new server handler.
    pub fn new(cache: Arc<AnalysisCache>, model: LocalModel, cookies: Option<Arc<dyn CookieSource>>) -> Self {
        Self { tool_router: Self::tool_router(), cache, model, cookies }
    }

    /// Analyze the cookies of a tab.
    ///
    /// Served from the cache while the cookie set is unchanged and the entry
    /// is younger than the TTL; otherwise generated by the local model.
    #[tool(
        description = "Explain the privacy impact of the cookies set for a URL. Returns the domain, cookie count, status (no_cookies, cached or generated) and the analysis text."
    )]
    async fn cookie_analyze(&self, params: Parameters<CookieAnalyzeParams>) -> Result<CallToolResult, McpError> {
        let generator: &dyn Generator = &self.model;
        analyze_impl(&self.cache, generator, self.cookies.as_deref(), params.0).await
    }

    #[tool(description = "Clear the cached analysis for a domain, or the whole cache when no domain is given.")]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        clear_impl(&self.cache, params.0).await
    }

    #[tool(description = "Report the number of cached analyses and the size of the persisted cache in bytes.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.cache).await
    }

    #[tool(description = "Remove cached analyses older than the TTL. Returns the number removed.")]
    async fn cache_sweep(&self) -> Result<CallToolResult, McpError> {
        sweep_impl(&self.cache).await
    }

    /// Start downloading the local model if it is missing.
    #[tool(description = "Start downloading the local language model when it is not installed yet.")]
    async fn model_pull(&self) -> Result<CallToolResult, McpError> {
        pull_impl(&self.model).await
    }
}

impl ServerHandler for CrumbwiseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "crumbwise".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbwise_client::ModelConfig;
    use crumbwise_core::cache::MemoryStorage;
    use crumbwise_core::config::AppConfig;

    fn server() -> CrumbwiseServer {
        let config = AppConfig::default();
        let cache = Arc::new(AnalysisCache::from_config(&config, Arc::new(MemoryStorage::new())));
        let model = LocalModel::new(ModelConfig::from(&config)).unwrap();
        CrumbwiseServer::new(cache, model, None)
    }

    #[test]
    fn test_lists_all_tools() {
        let server = server();
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["cache_clear", "cache_stats", "cache_sweep", "cookie_analyze", "model_pull"]);
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "crumbwise");
        assert!(info.capabilities.tools.is_some());
    }
}
