//! Favorites persisted to durable storage.
//!
//! The set is loaded once at startup and written through on every toggle,
//! so the stored array always matches memory after a mutation returns.

use std::collections::BTreeSet;

use crate::config::FAVORITES_KEY;
use crate::models::{Book, BookKey};
use crate::utils::storage::{self, KeyValueStore};

/// Favorited books keyed by `author|name`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Favorites {
    keys: BTreeSet<String>,
}

impl Favorites {
    /// Load favorites from storage.
    ///
    /// Absent or corrupt data yields an empty set.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get_item(FAVORITES_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(keys) => Self {
                keys: keys.into_iter().collect(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable favorites");
                Self::default()
            }
        }
    }

    pub fn is_favorite(&self, book: &Book) -> bool {
        self.contains(&book.key())
    }

    pub fn contains(&self, key: &BookKey) -> bool {
        self.keys.contains(&key.to_string())
    }

    /// Insert `book` if absent, remove it if present, then persist.
    ///
    /// Returns whether the book is a favorite afterwards. A failed write is
    /// logged; the in-memory change stands.
    pub fn toggle(&mut self, book: &Book, store: &impl KeyValueStore) -> bool {
        let key = book.key().to_string();
        let now_favorite = if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        };

        if let Err(e) = self.save(store) {
            tracing::warn!(error = %e, "failed to persist favorites");
        }
        now_favorite
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// Composite keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    fn save(&self, store: &impl KeyValueStore) -> Result<(), crate::core::error::StorageError> {
        let keys: Vec<&str> = self.keys().collect();
        storage::set_json(store, FAVORITES_KEY, &keys)
    }
}
