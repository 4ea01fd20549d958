//! Persistent key-value preferences (sidebar state, theme mode).
//!
//! Values are plain strings; callers own the encoding. Readers must tolerate
//! a missing key (first run) and fall back to their own defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StorageError;

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Preferences persisted as a flat JSON object on disk.
///
/// The whole map is rewritten on every `set`; there are only a couple of keys.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Open (or lazily create) the preferences file at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupted file is
    /// logged and treated as empty so the UI still starts with defaults.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match Self::read_file(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Ignoring saved preferences: {}", e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let json =
            std::fs::read_to_string(path).map_err(|e| StorageError::Read(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| StorageError::Corrupted(e.to_string()))
    }

    fn write_file(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| StorageError::Write(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.write_file(&values)?;
        tracing::debug!("Saved preference {} = {}", key, value);
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let prefs = Self::new();
        prefs.values.lock().insert(key.to_string(), value.to_string());
        prefs
    }
}

impl KeyValueStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
