//! Key-value storage seam under the analysis cache.
//!
//! The cache only needs three async primitives over JSON values. Each call is
//! independently failable; a missing key is not a failure.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::Error;

/// Asynchronous key-value storage holding JSON documents.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Error>;

    /// Replace the value stored under `key` in a single write.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), Error>;

    /// Delete `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Error> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), Error> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}
