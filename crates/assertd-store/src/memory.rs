//! In-memory implementation of the Backstore trait.
//!
//! It has the same semantics as SQLite but keeps everything in memory with
//! no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use assertd_core::{Assertion, AssertionType};

use crate::error::{Result, StoreError};
use crate::traits::{matches_filter, revision_outcome, Backstore, PutResult};

type Key = (AssertionType, Vec<String>);

/// In-memory backstore.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
/// Entries are ordered by type then primary key, so searches come out
/// sorted.
#[derive(Debug, Default)]
pub struct MemoryBackstore {
    inner: RwLock<BTreeMap<Key, Assertion>>,
}

impl MemoryBackstore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::LockPoisoned(e.to_string())
}

#[async_trait]
impl Backstore for MemoryBackstore {
    async fn put(&self, assertion: &Assertion) -> Result<PutResult> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        let key = (assertion.assertion_type(), assertion.primary_key().to_vec());
        let current = inner.get(&key).map(Assertion::revision);
        let result = revision_outcome(current, assertion.revision());

        if result.is_written() {
            inner.insert(key, assertion.clone());
        }

        Ok(result)
    }

    async fn get(
        &self,
        assertion_type: AssertionType,
        primary_key: &[String],
    ) -> Result<Option<Assertion>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .get(&(assertion_type, primary_key.to_vec()))
            .cloned())
    }

    async fn search(
        &self,
        assertion_type: AssertionType,
        filter: &[(&str, &str)],
    ) -> Result<Vec<Assertion>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .range((assertion_type, Vec::new())..)
            .take_while(|((t, _), _)| *t == assertion_type)
            .map(|(_, a)| a)
            .filter(|a| matches_filter(a, filter))
            .cloned()
            .collect())
    }

    async fn count(&self, assertion_type: Option<AssertionType>) -> Result<usize> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(match assertion_type {
            Some(t) => inner.keys().filter(|(kt, _)| *kt == t).count(),
            None => inner.len(),
        })
    }
}
