//! The script repository: single source of truth for user scripts
//!
//! Every mutation persists the full updated list before the in-memory
//! committed view advances. A failed write leaves the pre-mutation state as
//! the reported truth. The backing store serializes writes but has no
//! compare-and-swap, so concurrent writers end up last-writer-wins; that is
//! an accepted limitation, not something the repository papers over.

use crate::models::{ScriptEdit, UserScript};
use crate::storage::{KeyValueStore, StorageError, SCRIPTS_KEY};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to persist scripts: {0}")]
    Persist(#[from] StorageError),

    #[error("no script with id {0}")]
    NotFound(u32),
}

pub struct ScriptRepository {
    store: Arc<dyn KeyValueStore>,
    scripts: Vec<UserScript>,
}

impl ScriptRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            scripts: Vec::new(),
        }
    }

    /// Load the persisted list. A missing key or a value that does not
    /// deserialize falls back to an empty list; only a store read failure
    /// is surfaced.
    pub fn load(&mut self) -> Result<(), RepositoryError> {
        let value = self.store.get(SCRIPTS_KEY).map_err(RepositoryError::Persist)?;
        self.scripts = match value {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("stored script list is malformed, starting empty: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        log::debug!("loaded {} scripts", self.scripts.len());
        Ok(())
    }

    /// The committed script list.
    pub fn scripts(&self) -> &[UserScript] {
        &self.scripts
    }

    pub fn get(&self, id: u32) -> Option<&UserScript> {
        self.scripts.iter().find(|s| s.id == id)
    }

    /// Create a script with default fields. Ids are assigned monotonically:
    /// one past the current maximum, or 1 for an empty repository.
    pub fn create(&mut self) -> Result<UserScript, RepositoryError> {
        let id = self.scripts.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let script = UserScript::new(id);

        let mut updated = self.scripts.clone();
        updated.push(script.clone());
        self.commit(updated)?;
        Ok(script)
    }

    pub fn update(&mut self, id: u32, edit: &ScriptEdit) -> Result<(), RepositoryError> {
        let mut updated = self.scripts.clone();
        let script = updated
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        edit.apply(script);
        self.commit(updated)
    }

    pub fn delete(&mut self, id: u32) -> Result<(), RepositoryError> {
        if self.get(id).is_none() {
            return Err(RepositoryError::NotFound(id));
        }
        let updated: Vec<UserScript> =
            self.scripts.iter().filter(|s| s.id != id).cloned().collect();
        self.commit(updated)
    }

    pub fn toggle_pause(&mut self, id: u32) -> Result<bool, RepositoryError> {
        let mut updated = self.scripts.clone();
        let script = updated
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        script.is_paused = !script.is_paused;
        let now_paused = script.is_paused;
        self.commit(updated)?;
        Ok(now_paused)
    }

    /// Persist `updated` and only then make it the committed view.
    fn commit(&mut self, updated: Vec<UserScript>) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(&updated).map_err(StorageError::from)?;
        self.store.set(SCRIPTS_KEY, value)?;
        self.scripts = updated;
        Ok(())
    }
}
