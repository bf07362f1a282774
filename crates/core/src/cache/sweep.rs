//! Opportunistic removal of expired entries.
//!
//! Lookups enforce expiry on their own; sweeping only keeps the persisted
//! mapping from growing with domains that are never visited again.

use super::policy::CachePolicy;
use super::store::CacheStore;

/// Remove every expired entry, writing back only if something was removed.
///
/// Returns the number of entries removed.
pub async fn sweep(store: &CacheStore, policy: &CachePolicy, now_ms: i64) -> usize {
    let removed = store
        .modify("sweep", |map| {
            let before = map.len();
            map.retain(|_, entry| !policy.is_expired(entry, now_ms));
            before - map.len()
        })
        .await;

    if removed > 0 {
        tracing::info!(removed, "cleaned up expired cache entries");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::DEFAULT_CACHE_KEY;
    use crate::cache::store::tests::{FlakyStorage, entry};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    const TTL_MS: i64 = 86_400_000;

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = CacheStore::new(Arc::new(FlakyStorage::default()), DEFAULT_CACHE_KEY);
        let now = 5 * TTL_MS;
        store.put(entry("old.com", now - TTL_MS - 1)).await;
        store.put(entry("edge.com", now - TTL_MS)).await;
        store.put(entry("new.com", now)).await;

        let removed = sweep(&store, &CachePolicy::default(), now).await;
        assert_eq!(removed, 1);

        let map = store.read_all().await;
        assert!(!map.contains_key("old.com"));
        assert!(map.contains_key("edge.com"));
        assert!(map.contains_key("new.com"));
    }

    #[tokio::test]
    async fn test_sweep_without_expired_does_not_write() {
        let storage = Arc::new(FlakyStorage::default());
        let store = CacheStore::new(storage.clone(), DEFAULT_CACHE_KEY);
        store.put(entry("new.com", 100)).await;
        let writes = storage.writes.load(Ordering::SeqCst);

        assert_eq!(sweep(&store, &CachePolicy::default(), 200).await, 0);
        assert_eq!(storage.writes.load(Ordering::SeqCst), writes);
    }

    #[tokio::test]
    async fn test_sweep_empty_store() {
        let storage = Arc::new(FlakyStorage::default());
        let store = CacheStore::new(storage.clone(), DEFAULT_CACHE_KEY);
        assert_eq!(sweep(&store, &CachePolicy::default(), 0).await, 0);
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sweep_survives_read_failure() {
        let storage = Arc::new(FlakyStorage::default());
        let store = CacheStore::new(storage.clone(), DEFAULT_CACHE_KEY);
        store.put(entry("old.com", 0)).await;

        storage.fail_reads.store(true, Ordering::SeqCst);
        assert_eq!(sweep(&store, &CachePolicy::default(), 10 * TTL_MS).await, 0);
    }
}
