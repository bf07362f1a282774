//! cookie_analyze tool implementation.
//!
//! Returns the privacy analysis for the cookies of a tab, from cache when the
//! cookie set is unchanged and fresh, otherwise from the local model.

use crumbwise_client::{CookieSource, load_cookies_for_url};
use crumbwise_core::cache::{Analysis, AnalysisCache, Generator};
use crumbwise_core::cookie::dedupe_cookies;
use crumbwise_core::domain::domain_from_url;
use crumbwise_core::{CookieRecord, SameSite};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::json_result;

/// Parameters for the cookie_analyze tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookieAnalyzeParams {
    /// URL of the active tab.
    pub url: String,

    /// Cookies visible to the tab. When omitted they are read from the
    /// configured cookie jar.
    #[serde(default)]
    pub cookies: Option<Vec<CookieRecord>>,

    /// Drop any cached analysis for the domain and generate a new one.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Display details of one analysed cookie. The value is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieSummary {
    pub name: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl From<&CookieRecord> for CookieSummary {
    fn from(cookie: &CookieRecord) -> Self {
        Self {
            name: cookie.name.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            secure: cookie.secure,
            http_only: cookie.http_only,
            same_site: cookie.same_site,
        }
    }
}

/// Output from the cookie_analyze tool.
#[derive(Debug, Clone, Serialize)]
pub struct CookieAnalyzeOutput {
    /// Registrable-ish host the analysis is keyed by.
    pub domain: String,
    /// Number of distinct cookies analysed.
    pub cookie_count: usize,
    /// The analysed cookies, one card each.
    pub cookies: Vec<CookieSummary>,
    /// `no_cookies`, `cached` or `generated`, plus the analysis text.
    #[serde(flatten)]
    pub result: Analysis,
}

/// Implementation of the cookie_analyze tool.
pub async fn analyze_impl(
    cache: &AnalysisCache, generator: &dyn Generator, source: Option<&dyn CookieSource>, params: CookieAnalyzeParams,
) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(ToolError::InvalidInput("url cannot be empty".to_string()).into());
    }

    let domain = domain_from_url(&params.url);
    let cookies = match (params.cookies, source) {
        (Some(cookies), _) => dedupe_cookies(cookies),
        (None, Some(source)) => load_cookies_for_url(source, &params.url).await,
        (None, None) => Vec::new(),
    };

    let result = if params.force_refresh {
        cache.refresh(&domain, &cookies, generator).await?
    } else {
        cache.get_or_generate(&domain, &cookies, generator).await?
    };

    let summaries = cookies.iter().map(CookieSummary::from).collect();
    json_result(&CookieAnalyzeOutput { domain, cookie_count: cookies.len(), cookies: summaries, result })
}
