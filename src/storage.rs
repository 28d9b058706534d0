/// Key/value persistence for the new tab page
///
/// Every value is a flat string under a fixed key. The fail-soft accessors on
/// [`KeyValueStore`] never return errors: reads fall back to a default and
/// failed writes are logged and dropped.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Persisted keys
pub mod keys {
    pub const PROMPT_TEXT: &str = "promptText";
    pub const BACKGROUND_MODE: &str = "backgroundMode";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const BACKGROUND_IMAGE: &str = "backgroundImage";
    pub const RECENT_DOMAINS: &str = "recentDomains";

    pub const ALL: [&str; 5] = [
        PROMPT_TEXT,
        BACKGROUND_MODE,
        BACKGROUND_COLOR,
        BACKGROUND_IMAGE,
        RECENT_DOMAINS,
    ];
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to remove {key}: {reason}")]
    Remove { key: String, reason: String },
}

/// A persistent string-keyed store
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Stored value, or None if absent or unreadable
    fn get_opt(&self, key: &str) -> Option<String> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn get(&self, key: &str, default: &str) -> String {
        self.get_opt(key).unwrap_or_else(|| default.to_string())
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.write(key, value) {
            warn!("{}", e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.delete(key) {
            warn!("{}", e);
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

/// Load a JSON value; absent, unreadable or corrupt values yield None
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get_opt(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring corrupt value under {}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize>(store: &impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => warn!("Failed to serialize {}: {}", key, e),
    }
}

/// `window.localStorage`
///
/// Synchronous, so a read-modify-write of a value completes before any other
/// event handler runs.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            warn!("localStorage is not available, settings will not persist");
        }
        BrowserStore { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for BrowserStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(|e| StorageError::Remove {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// In-memory store; `set_failing(true)` makes every operation fail
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    failing: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing.get() {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.failing.get() {
            return Err(StorageError::Remove {
                key: key.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
