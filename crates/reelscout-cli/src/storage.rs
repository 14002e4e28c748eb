//! `SQLite`-backed [`LocalStorage`].

use std::path::Path;

use anyhow::{Context, Result};
use reelscout_core::{LocalStorage, MemoryStorage, MoviesStore};
use rusqlite::Connection;

/// Local storage kept in the `local_storage` table of the data database.
#[derive(Debug)]
pub struct DbStorage {
    conn: Connection,
}

impl DbStorage {
    /// Opens (and migrates) the database under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let conn = reelscout_db::open_db(dir).context("failed to open local storage database")?;
        Ok(Self { conn })
    }

    /// Lists every stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        reelscout_db::list_keys(&self.conn)
    }

    /// Removes a key. Returns `false` when it was not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        reelscout_db::remove_item(&self.conn, key)
    }
}

impl LocalStorage for DbStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        reelscout_db::get_item(&self.conn, key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        reelscout_db::set_item(&self.conn, key, value)
    }
}

/// Loads the movie collections, falling back to in-memory storage when the
/// database cannot be opened. Changes are then lost on exit.
pub fn open_store(dir: Option<&Path>) -> MoviesStore<Box<dyn LocalStorage>> {
    let storage: Box<dyn LocalStorage> = match DbStorage::open(dir) {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::debug!(error = %format!("{e:#}"), "local storage unavailable, using memory");
            Box::new(MemoryStorage::new())
        }
    };
    MoviesStore::load(storage)
}
