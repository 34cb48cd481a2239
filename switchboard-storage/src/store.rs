//! Persistent store trait definition.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store for connector and handler state.
///
/// Backends are expected to treat values as opaque JSON documents.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Get a value by key. Returns `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Set a value, replacing any previous value under the key.
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
