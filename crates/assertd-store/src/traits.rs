//! Backstore trait: the abstract interface for assertion persistence.
//!
//! A backstore keeps exactly one assertion per `(type, primary key)`: the
//! highest revision it has been given. It does no signature or trust
//! checks; the database does those before calling [`Backstore::put`].

use async_trait::async_trait;
use assertd_core::{Assertion, AssertionType};

use crate::error::Result;

/// Result of putting an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutResult {
    /// No assertion with this primary key was stored.
    Inserted,
    /// A lower revision was stored and has been replaced.
    Replaced {
        /// The revision that was replaced.
        previous_revision: u64,
    },
    /// The same revision is already stored (idempotent, not an error).
    Unchanged,
    /// A higher revision is already stored; nothing was written.
    Stale {
        /// The revision currently stored.
        current_revision: u64,
    },
}

impl PutResult {
    /// Whether the store contents changed.
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced { .. })
    }
}

/// The revision ordering rule shared by all backstores.
pub(crate) fn revision_outcome(current: Option<u64>, incoming: u64) -> PutResult {
    match current {
        None => PutResult::Inserted,
        Some(current) if current < incoming => PutResult::Replaced {
            previous_revision: current,
        },
        Some(current) if current == incoming => PutResult::Unchanged,
        Some(current) => PutResult::Stale {
            current_revision: current,
        },
    }
}

/// Whether an assertion carries every `(header, value)` pair of a filter.
pub fn matches_filter(assertion: &Assertion, filter: &[(&str, &str)]) -> bool {
    filter
        .iter()
        .all(|(name, value)| assertion.header(name) == Some(*value))
}

/// The Backstore trait: async interface for assertion persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` is used internally to avoid blocking the
/// runtime.
#[async_trait]
pub trait Backstore: Send + Sync {
    /// Store an assertion, keeping only the highest revision per primary key.
    ///
    /// # Returns
    /// - `Inserted` if the primary key was new.
    /// - `Replaced` if a lower revision was stored.
    /// - `Unchanged` if the same revision is already stored.
    /// - `Stale` if a higher revision is already stored.
    async fn put(&self, assertion: &Assertion) -> Result<PutResult>;

    /// Get the current revision of an assertion.
    async fn get(
        &self,
        assertion_type: AssertionType,
        primary_key: &[String],
    ) -> Result<Option<Assertion>>;

    /// Find all assertions of a type carrying every header in `filter`.
    ///
    /// Results are ordered by primary key.
    async fn search(
        &self,
        assertion_type: AssertionType,
        filter: &[(&str, &str)],
    ) -> Result<Vec<Assertion>>;

    /// Count stored assertions, of one type or of all types.
    async fn count(&self, assertion_type: Option<AssertionType>) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_outcome() {
        assert_eq!(revision_outcome(None, 0), PutResult::Inserted);
        assert_eq!(
            revision_outcome(Some(1), 2),
            PutResult::Replaced {
                previous_revision: 1
            }
        );
        assert_eq!(revision_outcome(Some(2), 2), PutResult::Unchanged);
        assert_eq!(
            revision_outcome(Some(3), 2),
            PutResult::Stale {
                current_revision: 3
            }
        );
        assert!(PutResult::Inserted.is_written());
        assert!(!PutResult::Unchanged.is_written());
    }
}
