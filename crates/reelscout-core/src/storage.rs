//! Key/value storage backing the favorites, reviews and playlists.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

/// String key/value storage with local-storage semantics.
///
/// Implemented by [`MemoryStorage`] and by the `SQLite` adapter in the CLI.
pub trait LocalStorage {
    /// Returns the stored value for `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(String::from(key), String::from(value));
        Ok(())
    }
}

impl<S: LocalStorage + ?Sized> LocalStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_memory_storage_missing_key() {
        // Arrange
        let storage = MemoryStorage::new();

        // Act
        let value = storage.get_item("absent").unwrap();

        // Assert
        assert!(value.is_none());
    }

    #[test]
    fn test_memory_storage_overwrites() {
        // Arrange
        let storage = MemoryStorage::new();
        storage.set_item("k", "one").unwrap();

        // Act
        storage.set_item("k", "two").unwrap();

        // Assert
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_boxed_storage_delegates() {
        // Arrange
        let storage: Box<dyn LocalStorage> = Box::new(MemoryStorage::new());

        // Act
        storage.set_item("k", "v").unwrap();

        // Assert
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
