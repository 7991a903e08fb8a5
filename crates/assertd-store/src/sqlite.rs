//! Persistent [`Backstore`] on a single SQLite file.
//!
//! Each call runs on the blocking pool against one shared connection.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use assertd_core::{Assertion, AssertionType, Blake3Hash};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{matches_filter, revision_outcome, Backstore, PutResult};

/// Assertions kept in SQLite, one row per type and primary key.
pub struct SqliteBackstore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackstore {
    /// Open or create the database file at `path`, migrating its schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Unix time in milliseconds for the `stored_at` column.
fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn encode_primary_key(primary_key: &[String]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(primary_key, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn to_sql_revision(revision: u64) -> Result<i64> {
    i64::try_from(revision)
        .map_err(|_| StoreError::InvalidData(format!("revision {} out of range", revision)))
}

/// Rebuild an assertion from a stored row, checking it against the row's
/// type and digest.
fn decode_row(assertion_type: &str, digest: &[u8], encoded: &[u8]) -> Result<Assertion> {
    if Blake3Hash::hash(encoded).as_bytes().as_slice() != digest {
        return Err(StoreError::InvalidData(format!(
            "stored {} assertion does not match its digest",
            assertion_type
        )));
    }

    let assertion = Assertion::decode(encoded).map_err(|e| {
        StoreError::InvalidData(format!(
            "stored {} assertion cannot be decoded: {}",
            assertion_type, e
        ))
    })?;

    if assertion.assertion_type().name() != assertion_type {
        return Err(StoreError::InvalidData(format!(
            "stored {} row holds a {} assertion",
            assertion_type,
            assertion.assertion_type()
        )));
    }

    Ok(assertion)
}

#[async_trait]
impl Backstore for SqliteBackstore {
    async fn put(&self, assertion: &Assertion) -> Result<PutResult> {
        let assertion_type = assertion.assertion_type();
        let primary_key = encode_primary_key(assertion.primary_key())?;
        let revision = assertion.revision();
        let sql_revision = to_sql_revision(revision)?;
        let digest = assertion.digest();
        let encoded = assertion.encode();

        self.run(move |conn| {
            let tx = conn.transaction()?;

            let current: Option<i64> = tx
                .query_row(
                    "SELECT revision FROM assertions
                     WHERE assertion_type = ?1 AND primary_key = ?2",
                    params![assertion_type.name(), primary_key],
                    |row| row.get(0),
                )
                .optional()?;

            let result = revision_outcome(current.map(|r| r as u64), revision);
            if !result.is_written() {
                return Ok(result);
            }

            tx.execute(
                "INSERT OR REPLACE INTO assertions (
                    assertion_type, primary_key, revision, digest, encoded, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    assertion_type.name(),
                    primary_key,
                    sql_revision,
                    digest.as_bytes().as_slice(),
                    encoded,
                    now_millis(),
                ],
            )?;
            tx.commit()?;

            debug!(%assertion_type, revision, ?result, "stored assertion row");
            Ok(result)
        })
        .await
    }

    async fn get(
        &self,
        assertion_type: AssertionType,
        primary_key: &[String],
    ) -> Result<Option<Assertion>> {
        let primary_key = encode_primary_key(primary_key)?;

        self.run(move |conn| {
            let row: Option<(Vec<u8>, Vec<u8>)> = conn
                .query_row(
                    "SELECT digest, encoded FROM assertions
                     WHERE assertion_type = ?1 AND primary_key = ?2",
                    params![assertion_type.name(), primary_key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            row.map(|(digest, encoded)| decode_row(assertion_type.name(), &digest, &encoded))
                .transpose()
        })
        .await
    }

    async fn search(
        &self,
        assertion_type: AssertionType,
        filter: &[(&str, &str)],
    ) -> Result<Vec<Assertion>> {
        let rows = self
            .run(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT digest, encoded FROM assertions WHERE assertion_type = ?1",
                )?;
                let rows = stmt
                    .query_map(params![assertion_type.name()], |row| {
                        Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        let mut found = Vec::new();
        for (digest, encoded) in rows {
            let assertion = decode_row(assertion_type.name(), &digest, &encoded)?;
            if matches_filter(&assertion, filter) {
                found.push(assertion);
            }
        }
        // CBOR blobs do not sort like the keys they encode.
        found.sort_by(|a, b| a.primary_key().cmp(b.primary_key()));
        Ok(found)
    }

    async fn count(&self, assertion_type: Option<AssertionType>) -> Result<usize> {
        self.run(move |conn| {
            let count: i64 = match assertion_type {
                Some(t) => conn.query_row(
                    "SELECT COUNT(*) FROM assertions WHERE assertion_type = ?1",
                    params![t.name()],
                    |row| row.get(0),
                )?,
                None => conn.query_row("SELECT COUNT(*) FROM assertions", [], |row| row.get(0))?,
            };
            Ok(count as usize)
        })
        .await
    }
}
