//! In-memory store adapter, the default backend.

use crate::store::{PersistentStore, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-memory key-value store. State is lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStoreAdapter {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PersistentStore for MemoryStoreAdapter {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
