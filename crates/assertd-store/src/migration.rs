//! Versioned SQLite schema.
//!
//! The schema version is kept in SQLite's `user_version` pragma. Entry `i`
//! of [`MIGRATIONS`] moves the schema from version `i` to `i + 1`, and all
//! pending entries run in one transaction.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Schema steps, oldest first.
const MIGRATIONS: &[&str] = &[
    // v1: one row per (type, primary key), holding the highest revision seen.
    // The primary key is a CBOR array of header values and the digest is the
    // Blake3 hash of the encoded assertion.
    "CREATE TABLE assertions (
        assertion_type TEXT NOT NULL,
        primary_key BLOB NOT NULL,
        revision INTEGER NOT NULL,
        digest BLOB NOT NULL,
        encoded BLOB NOT NULL,
        stored_at INTEGER NOT NULL,
        PRIMARY KEY (assertion_type, primary_key)
    );
    CREATE INDEX idx_assertions_type ON assertions(assertion_type);",
];

/// The schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open. Fails if the file was written by a newer
/// schema.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            found, CURRENT_VERSION
        )));
    }
    if found == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        let version = step as u32 + 1;
        tx.execute_batch(sql)
            .map_err(|e| StoreError::Migration(format!("schema version {}: {}", version, e)))?;
        debug!(version, "applied schema migration");
    }
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// The version recorded in the file, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
