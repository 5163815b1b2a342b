//! Durable key-value storage.
//!
//! [`KeyValueStore`] is the seam between the stores in `core` and the
//! browser's localStorage. [`MemoryStore`] backs tests and stands in when
//! localStorage is unavailable (private mode, disabled storage), so the app
//! keeps working for the session without persisting anything.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;

use super::dom;
use crate::core::error::StorageError;

/// String key-value storage with localStorage semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Store a value as JSON.
pub fn set_json<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    data: &T,
) -> Result<(), StorageError> {
    let json =
        serde_json::to_string(data).map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
    store.set_item(key, &json)
}

// =============================================================================
// Browser localStorage
// =============================================================================

/// Browser localStorage for the current origin.
#[derive(Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// Open localStorage, or `None` if the browser denies access.
    pub fn open() -> Option<Self> {
        dom::local_storage().map(|storage| Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed(key.to_string()))
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Session-only storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage handle shared across the app.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Open localStorage, falling back to memory with a warning.
pub fn open_shared() -> SharedStore {
    match LocalStore::open() {
        Some(store) => Rc::new(store),
        None => {
            tracing::warn!("localStorage unavailable; favorites will not persist");
            Rc::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_json() {
        let store = MemoryStore::new();
        set_json(&store, "k", &vec!["a", "b"]).unwrap();
        assert_eq!(store.get_item("k").as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(store.get_item("missing"), None);
    }

    #[test]
    fn test_shared_rc_delegates() {
        let store: SharedStore = Rc::new(MemoryStore::new());
        store.set_item("x", "1").unwrap();
        assert_eq!(store.get_item("x").as_deref(), Some("1"));
    }
}
