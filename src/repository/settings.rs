//! LLM settings persistence

use crate::models::LlmSettings;
use crate::storage::{KeyValueStore, StorageError, LLM_SETTINGS_KEY};
use std::sync::Arc;

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load settings, falling back to defaults when none are stored or the
    /// stored record does not deserialize.
    pub fn load(&self) -> Result<LlmSettings, StorageError> {
        let value = self.store.get(LLM_SETTINGS_KEY)?;
        Ok(match value {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("stored LLM settings are malformed, using defaults: {}", e);
                LlmSettings::default()
            }),
            None => LlmSettings::default(),
        })
    }

    pub fn save(&self, settings: &LlmSettings) -> Result<(), StorageError> {
        let value = serde_json::to_value(settings)?;
        self.store.set(LLM_SETTINGS_KEY, value)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(LLM_SETTINGS_KEY)
    }
}
