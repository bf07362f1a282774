//! Persisted analysis cache: one JSON mapping of domain to entry under a
//! single storage key.
//!
//! Storage failures never escape this module. A failed read behaves like an
//! empty cache and a failed write leaves the cache as it was; both are logged.

use std::collections::BTreeMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::storage::KeyValueStorage;
use crate::Error;

/// Storage key the mapping lives under.
pub const DEFAULT_CACHE_KEY: &str = "cookieAnalysisCache";

/// A cached analysis for one domain.
///
/// `fingerprint` is always the fingerprint of exactly the cookie set that
/// produced `analysis_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntry {
    pub domain: String,

    #[serde(rename = "cookieHash")]
    pub fingerprint: String,

    #[serde(rename = "analysis")]
    pub analysis_text: String,

    /// Milliseconds since epoch.
    #[serde(rename = "timestamp")]
    pub created_at_ms: i64,

    #[serde(rename = "cookieCount")]
    pub cookie_count: usize,
}

/// The whole persisted value.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Summary of the persisted cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Size in bytes of the serialized mapping.
    pub total_size: usize,
}

/// Domain-keyed cache over a key-value storage backend.
///
/// Every read-modify-write cycle issued through one `CacheStore` is
/// serialized. Separate processes sharing the backend still race, and the
/// last whole-mapping write wins.
pub struct CacheStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    rmw: Mutex<()>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore").field("key", &self.key).finish_non_exhaustive()
    }
}

impl CacheStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into(), rmw: Mutex::new(()) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the mapping, distinguishing a failed read from an empty cache.
    ///
    /// An undecodable value reads as empty so the next write replaces it.
    async fn load(&self) -> Result<CacheMap, Error> {
        let value = match self.storage.get(&self.key).await {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(CacheMap::new()),
            Err(Error::CorruptValue(e)) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unparseable cache value");
                return Ok(CacheMap::new());
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_value(value) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding undecodable cache value");
                Ok(CacheMap::new())
            }
        }
    }

    /// Read the full mapping. Absent key or failed read yields an empty map.
    pub async fn read_all(&self) -> CacheMap {
        match self.load().await {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "cache read failed, treating as empty");
                CacheMap::new()
            }
        }
    }

    /// Replace the full mapping in one storage write.
    ///
    /// Returns whether the write reached storage.
    pub async fn write_all(&self, map: &CacheMap) -> bool {
        let value = match serde_json::to_value(map) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "cache encode failed, not persisted");
                return false;
            }
        };

        match self.storage.set(&self.key, value).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, entries = map.len(), error = %e, "cache write failed, not persisted");
                false
            }
        }
    }

    /// Apply `f` to the current mapping and persist it if `f` reports changes.
    ///
    /// Returns the number of changes `f` reported. A failed read skips both
    /// `f` and the write, so a transient read error cannot wipe other domains.
    pub(crate) async fn modify<F>(&self, op: &'static str, f: F) -> usize
    where
        F: FnOnce(&mut CacheMap) -> usize,
    {
        let _guard = self.rmw.lock().await;

        let mut map = match self.load().await {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(key = %self.key, op, error = %e, "cache read failed, skipping update");
                return 0;
            }
        };

        let changed = f(&mut map);
        if changed > 0 && !self.write_all(&map).await {
            return 0;
        }
        changed
    }

    /// Entry for `domain`, if any.
    pub async fn get(&self, domain: &str) -> Option<CacheEntry> {
        self.read_all().await.remove(domain)
    }

    /// Insert or wholesale overwrite the entry for its domain.
    pub async fn put(&self, entry: CacheEntry) -> bool {
        let domain = entry.domain.clone();
        let written = self
            .modify("put", move |map| {
                map.insert(entry.domain.clone(), entry);
                1
            })
            .await;

        if written > 0 {
            tracing::info!(domain = %domain, "cached analysis");
        }
        written > 0
    }

    /// Delete the entry for `domain`. Returns whether an entry was removed.
    pub async fn remove(&self, domain: &str) -> bool {
        let removed = self
            .modify("remove", |map| usize::from(map.remove(domain).is_some()))
            .await;

        if removed > 0 {
            tracing::info!(domain, "cleared cache for domain");
        }
        removed > 0
    }

    /// Delete the entry for `domain` only if `pred` still holds for the
    /// entry read inside the update.
    pub async fn remove_if<P>(&self, domain: &str, pred: P) -> bool
    where
        P: FnOnce(&CacheEntry) -> bool,
    {
        let removed = self
            .modify("remove_if", |map| match map.get(domain) {
                Some(entry) if pred(entry) => usize::from(map.remove(domain).is_some()),
                _ => 0,
            })
            .await;

        if removed > 0 {
            tracing::debug!(domain, "removed cache entry");
        }
        removed > 0
    }

    /// Drop the whole mapping with a single storage remove.
    pub async fn clear_all(&self) -> bool {
        let _guard = self.rmw.lock().await;
        match self.storage.remove(&self.key).await {
            Ok(()) => {
                tracing::info!(key = %self.key, "cleared all analysis cache");
                true
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "cache clear failed");
                false
            }
        }
    }

    /// Entry count and serialized size; zeroes on read failure.
    pub async fn stats(&self) -> CacheStats {
        let map = self.read_all().await;
        let total_size = serde_json::to_string(&map).map(|s| s.len()).unwrap_or(0);
        CacheStats { total_entries: map.len(), total_size }
    }
}
