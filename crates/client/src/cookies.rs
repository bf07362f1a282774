//! Cookie enumeration for a tab.
//!
//! The browser-side `cookies.getAll` call is modelled by [`CookieSource`].
//! [`CookieJar`] serves the same queries from a cookie export file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crumbwise_core::cookie::dedupe_cookies;
use crumbwise_core::domain::try_domain_from_url;
use crumbwise_core::{CookieFilter, CookieRecord, Error};

/// Anything that can list cookies matching a filter.
#[async_trait]
pub trait CookieSource: Send + Sync {
    async fn get_all(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, Error>;
}

/// Cookies read from a JSON array in browser export format.
///
/// The file is re-read on every query so an updated export is picked up
/// without restarting.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<CookieRecord>, Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::CookieSource(format!("{}: {e}", self.path.display())))?;

        serde_json::from_slice(&bytes).map_err(|e| Error::CookieSource(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl CookieSource for CookieJar {
    async fn get_all(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, Error> {
        let cookies = self.read().await?;
        Ok(cookies.into_iter().filter(|c| c.matches(filter)).collect())
    }
}

/// Cookies relevant to a tab: those sent to its URL plus those set for its
/// domain, one per (name, domain).
///
/// Any failure is logged and yields no cookies.
pub async fn load_cookies_for_url(source: &dyn CookieSource, tab_url: &str) -> Vec<CookieRecord> {
    match query_tab(source, tab_url).await {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::error!(url = tab_url, error = %e, "get cookies failed");
            Vec::new()
        }
    }
}

async fn query_tab(source: &dyn CookieSource, tab_url: &str) -> Result<Vec<CookieRecord>, Error> {
    let domain = try_domain_from_url(tab_url)?;

    let by_url = source.get_all(&CookieFilter::for_url(tab_url)).await?;
    let by_domain = source.get_all(&CookieFilter::for_domain(domain)).await?;

    Ok(dedupe_cookies(by_url.into_iter().chain(by_domain)))
}
