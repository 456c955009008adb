//! JSON-file store used by the CLI

use super::{KeyValueStore, StorageError};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// [`KeyValueStore`] persisting all keys into one JSON object file.
///
/// Writes go through a sibling temp file and a rename, so a failed write
/// never leaves a truncated store behind.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading existing content. A missing file is
    /// an empty store; a malformed one is a read error, not silently reset.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(StorageError::Read(format!("{}: {}", path.display(), e))),
        };
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(&Value::Object(entries.clone()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| StorageError::Write(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::Write(format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let cache = self.cache.lock().expect("store mutex poisoned");
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().expect("store mutex poisoned");
        let mut updated = cache.clone();
        updated.insert(key.to_string(), value);
        self.flush(&updated)?;
        *cache = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().expect("store mutex poisoned");
        let mut updated = cache.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *cache = updated;
        Ok(())
    }
}
