//! Schema version management using `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version.
const CURRENT_VERSION: u32 = 2;

/// Runs database migrations up to `CURRENT_VERSION`.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    if version < 1 {
        migrate_v1(conn).context("migration to v1 failed")?;
    }
    if version < 2 {
        migrate_v2(conn).context("migration to v2 failed")?;
    }

    if version < CURRENT_VERSION {
        tracing::debug!(from = version, to = CURRENT_VERSION, "schema migrated");
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)
        .context("failed to update user_version")?;

    Ok(())
}

/// Migration to v1: create the `local_storage` key/value table.
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );",
    )
    .context("failed to create local_storage table")?;

    Ok(())
}

/// Migration to v2: track when each key was last written.
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "ALTER TABLE local_storage ADD COLUMN updated_at TEXT;
         UPDATE local_storage SET updated_at = datetime('now') WHERE updated_at IS NULL;",
    )
    .context("failed to add updated_at column")?;

    Ok(())
}
