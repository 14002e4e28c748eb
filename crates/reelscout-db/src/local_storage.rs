//! Key/value operations on the `local_storage` table.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Reads the value stored under `key`.
///
/// Returns `None` if the key has never been written.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read local_storage key {key}"))
}

/// Writes `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value],
    )
    .with_context(|| format!("failed to write local_storage key {key}"))?;
    Ok(())
}

/// Deletes `key`. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_item(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM local_storage WHERE key = ?1", [key])
        .with_context(|| format!("failed to delete local_storage key {key}"))?;
    Ok(removed > 0)
}

/// Lists all stored keys in ascending order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_keys(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT key FROM local_storage ORDER BY key")
        .context("failed to prepare local_storage key query")?;

    let rows = stmt
        .query_map([], |row| row.get(0))
        .context("failed to query local_storage keys")?;

    rows.collect::<std::result::Result<Vec<String>, _>>()
        .context("failed to read local_storage keys")
}
