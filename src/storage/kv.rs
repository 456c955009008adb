//! Store trait and error taxonomy

use serde_json::Value;
use thiserror::Error;

/// Storage key for the persisted script list.
pub const SCRIPTS_KEY: &str = "scripts";

/// Storage key for the LLM settings record.
pub const LLM_SETTINGS_KEY: &str = "llm_settings";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable key-value store with JSON values.
///
/// Writes are serialized by the backing store but offer no compare-and-swap;
/// concurrent writers get last-writer-wins semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
