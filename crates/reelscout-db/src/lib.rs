//! Persistent local storage for reelscout.
//!
//! Uses `rusqlite` (bundled `SQLite`) to keep a small key/value table
//! holding the serialized favorites, reviews and playlists.

mod connection;
/// Key/value storage operations.
pub mod local_storage;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, resolve_db_path};
pub use local_storage::{get_item, list_keys, remove_item, set_item};
