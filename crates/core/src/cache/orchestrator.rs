//! The single entry point UI surfaces use to obtain a cookie analysis.
//!
//! A lookup that hits never touches the generator. On a miss the generator
//! runs exactly once, bounded by the configured timeout, and a successful
//! result is written back before it is returned. Storage trouble only ever
//! costs a regeneration; generation trouble is always returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::policy::{CachePolicy, Lookup, MissReason};
use super::store::{CacheStats, CacheStore};
use super::sweep;
use crate::config::AppConfig;
use crate::cookie::CookieRecord;
use crate::error::{Error, GenerationError};

/// Produces analysis text for a cookie set.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, cookies: &[CookieRecord]) -> Result<String, GenerationError>;
}

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// What [`AnalysisCache::get_or_generate`] produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "analysis", rename_all = "snake_case")]
pub enum Analysis {
    /// Nothing to analyze; neither cache nor generator was consulted.
    NoCookies,
    Cached(String),
    Generated(String),
}

impl Analysis {
    pub fn text(&self) -> Option<&str> {
        match self {
            Analysis::NoCookies => None,
            Analysis::Cached(text) | Analysis::Generated(text) => Some(text),
        }
    }
}

/// Cache-aware front of the generator.
pub struct AnalysisCache {
    store: CacheStore,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    generation_timeout: Duration,
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("store", &self.store)
            .field("policy", &self.policy)
            .field("generation_timeout", &self.generation_timeout)
            .finish_non_exhaustive()
    }
}

impl AnalysisCache {
    pub fn new(store: CacheStore, policy: CachePolicy, clock: Arc<dyn Clock>, generation_timeout: Duration) -> Self {
        Self { store, policy, clock, generation_timeout }
    }

    /// Wire a cache from configuration using the system clock.
    pub fn from_config(config: &AppConfig, storage: Arc<dyn super::storage::KeyValueStorage>) -> Self {
        Self::new(
            CacheStore::new(storage, config.cache_key.clone()),
            CachePolicy::new(config.ttl()),
            Arc::new(SystemClock),
            config.generation_timeout(),
        )
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Return the cached analysis for `cookies` on `domain`, or generate,
    /// persist and return a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Generation` if the generator fails, times out or
    /// answers with only whitespace. Storage failures are never returned.
    pub async fn get_or_generate(
        &self, domain: &str, cookies: &[CookieRecord], generator: &dyn Generator,
    ) -> Result<Analysis, Error> {
        if cookies.is_empty() {
            tracing::debug!(domain, "no cookies, skipping analysis");
            return Ok(Analysis::NoCookies);
        }

        let entry = self.store.get(domain).await;
        let reason = match self
            .policy
            .lookup(domain, cookies, entry.as_ref(), self.clock.now_ms())
        {
            Lookup::Hit(text) => return Ok(Analysis::Cached(text)),
            Lookup::Miss(reason) => reason,
        };

        if reason == MissReason::Expired {
            let now_ms = self.clock.now_ms();
            self.store
                .remove_if(domain, |entry| self.policy.is_expired(entry, now_ms))
                .await;
        }

        tracing::info!(domain, cookie_count = cookies.len(), reason = ?reason, "generating analysis");
        let text = self.generate_bounded(domain, cookies, generator).await?;

        let entry = self.policy.write(domain, cookies, &text, self.clock.now_ms());
        self.store.put(entry).await;

        Ok(Analysis::Generated(text))
    }

    async fn generate_bounded(
        &self, domain: &str, cookies: &[CookieRecord], generator: &dyn Generator,
    ) -> Result<String, Error> {
        let result = match tokio::time::timeout(self.generation_timeout, generator.generate(cookies)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::TimedOut(self.generation_timeout)),
        };

        let text = result.map_err(|e| {
            tracing::error!(domain, cookie_count = cookies.len(), error = %e, "analysis generation failed");
            Error::Generation(e)
        })?;

        if text.trim().is_empty() {
            tracing::error!(domain, "analysis generation returned empty text");
            return Err(GenerationError::EmptyResponse.into());
        }

        Ok(text)
    }

    /// Forced refresh: drop the domain's entry, then run the normal flow.
    pub async fn refresh(
        &self, domain: &str, cookies: &[CookieRecord], generator: &dyn Generator,
    ) -> Result<Analysis, Error> {
        self.clear_domain(domain).await;
        self.get_or_generate(domain, cookies, generator).await
    }

    pub async fn clear_domain(&self, domain: &str) -> bool {
        self.store.remove(domain).await
    }

    pub async fn clear_all(&self) -> bool {
        self.store.clear_all().await
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.stats().await
    }

    /// Remove expired entries; meant to run once per activation.
    pub async fn sweep(&self) -> usize {
        sweep::sweep(&self.store, &self.policy, self.clock.now_ms()).await
    }
}
