//! The Database: the entry point for adding and finding assertions.
//!
//! Every assertion goes through the same pipeline before it is stored:
//! envelope and schema checks, signature verification, authority checks and
//! prerequisite checks. Storage then keeps only the highest revision per
//! primary key.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use assertd_core::{codec, Assertion, AssertionType, Ref};
use assertd_store::{Backstore, PutResult};
use assertd_trust::{
    check_authority, check_prerequisites, verify_signature, AssertionLookup, KeyValidity,
    TrustError, TrustRoots,
};

use crate::config::DatabaseConfig;
use crate::error::{DatabaseError, Result};

/// Outcome of a successful add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The primary key was new.
    Inserted,
    /// A lower revision was replaced.
    Replaced { previous_revision: u64 },
    /// The same revision was already present; nothing changed.
    Unchanged,
}

/// A database of verified assertions.
///
/// Reads may run concurrently. Adds are serialized so that the checks and
/// the write happen against the same contents.
pub struct Database<S: Backstore> {
    roots: TrustRoots,
    store: Arc<S>,
    check_key_validity: bool,
    write_lock: Mutex<()>,
}

impl<S: Backstore> Database<S> {
    /// Open a database over a backstore.
    ///
    /// Fails if a trusted assertion is not an `account` or `account-key`.
    pub fn open(store: S, config: DatabaseConfig) -> Result<Self> {
        let roots = TrustRoots::from_assertions(config.trusted)
            .map_err(|e| DatabaseError::Config(e.to_string()))?;

        info!(
            trusted = roots.len(),
            accounts = ?roots.accounts().collect::<Vec<_>>(),
            "opened assertion database"
        );

        Ok(Self {
            roots,
            store: Arc::new(store),
            check_key_validity: config.check_key_validity,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn trust_roots(&self) -> &TrustRoots {
        &self.roots
    }

    /// Whether an account is a directly trusted authority.
    pub fn is_trusted_account(&self, account_id: &str) -> bool {
        self.roots.is_trusted_account(account_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode an encoded assertion and add it.
    pub async fn add_bytes(&self, data: &[u8]) -> Result<(Assertion, AddOutcome)> {
        let raw = codec::decode(data)?;
        let assertion = Assertion::from_raw(raw)?;
        let outcome = self.add(&assertion).await?;
        Ok((assertion, outcome))
    }

    /// Check an assertion and store it.
    ///
    /// A higher revision replaces the stored one. The same revision is a
    /// no-op. A lower revision is an error.
    pub async fn add(&self, assertion: &Assertion) -> Result<AddOutcome> {
        let _guard = self.write_lock.lock().await;

        if let Some(trusted) = self.roots.get(&assertion.to_ref()) {
            if trusted == assertion {
                debug!(reference = %assertion.to_ref(), "trusted assertion already present");
                return Ok(AddOutcome::Unchanged);
            }
            warn!(reference = %assertion.to_ref(), "rejected assertion shadowing a trusted one");
            return Err(DatabaseError::Trusted {
                assertion_type: assertion.assertion_type(),
                description: assertion.describe(),
            });
        }

        self.check_unlocked(assertion).await?;

        match self.store.put(assertion).await? {
            PutResult::Inserted => {
                debug!(reference = %assertion.to_ref(), revision = assertion.revision(), "added assertion");
                Ok(AddOutcome::Inserted)
            }
            PutResult::Replaced { previous_revision } => {
                debug!(
                    reference = %assertion.to_ref(),
                    revision = assertion.revision(),
                    previous_revision,
                    "replaced assertion"
                );
                Ok(AddOutcome::Replaced { previous_revision })
            }
            PutResult::Unchanged => {
                debug!(
                    reference = %assertion.to_ref(),
                    revision = assertion.revision(),
                    "revision already present"
                );
                Ok(AddOutcome::Unchanged)
            }
            PutResult::Stale { current_revision } => Err(DatabaseError::RevisionConflict {
                assertion_type: assertion.assertion_type(),
                description: assertion.describe(),
                revision: assertion.revision(),
                current: current_revision,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Run signature, authority and prerequisite checks against the current
    /// contents without storing anything.
    pub async fn check(&self, assertion: &Assertion) -> Result<()> {
        self.check_unlocked(assertion).await
    }

    /// Find the current revision of an assertion. Trusted assertions are
    /// consulted first.
    pub async fn find(
        &self,
        assertion_type: AssertionType,
        primary_key: &[String],
    ) -> Result<Assertion> {
        if let Some(trusted) = self.roots.find(assertion_type, primary_key) {
            return Ok(trusted.clone());
        }
        self.store
            .get(assertion_type, primary_key)
            .await?
            .ok_or_else(|| {
                DatabaseError::NotFound(Ref::new(assertion_type, primary_key.iter().cloned()))
            })
    }

    /// Find an assertion by reference.
    pub async fn find_ref(&self, reference: &Ref) -> Result<Assertion> {
        self.find(reference.assertion_type, &reference.primary_key)
            .await
    }

    /// Find all assertions of a type whose headers match `filter`, ordered
    /// by primary key.
    pub async fn find_many(
        &self,
        assertion_type: AssertionType,
        filter: &[(&str, &str)],
    ) -> Result<Vec<Assertion>> {
        let mut found: Vec<Assertion> = self
            .roots
            .iter()
            .filter(|a| a.assertion_type() == assertion_type)
            .filter(|a| assertd_store::matches_filter(a, filter))
            .cloned()
            .collect();
        found.extend(self.store.search(assertion_type, filter).await?);
        found.sort_by(|a, b| a.primary_key().cmp(b.primary_key()));
        Ok(found)
    }

    /// The references an assertion needs resolved before it is accepted.
    pub fn prerequisites(&self, assertion: &Assertion) -> Vec<Ref> {
        assertion.prerequisites()
    }

    async fn check_unlocked(&self, assertion: &Assertion) -> Result<()> {
        let validity = if self.check_key_validity {
            KeyValidity::now()
        } else {
            KeyValidity::Unchecked
        };
        let lookup = StoreLookup(self.store.as_ref());

        if let Err(err) = verify_signature(assertion, &self.roots, &lookup, validity).await {
            warn!(
                reference = %assertion.to_ref(),
                authority = assertion.authority_id(),
                error = %err,
                "rejected assertion signature"
            );
            return Err(err.into());
        }

        if let Err(err) = check_authority(assertion, &self.roots) {
            warn!(
                reference = %assertion.to_ref(),
                authority = assertion.authority_id(),
                error = %err,
                "rejected assertion authority"
            );
            return Err(err.into());
        }

        check_prerequisites(assertion, &self.roots, &lookup).await?;
        Ok(())
    }
}

/// Resolves references against a backstore.
struct StoreLookup<'a, S: Backstore>(&'a S);

#[async_trait]
impl<S: Backstore> AssertionLookup for StoreLookup<'_, S> {
    async fn lookup(&self, reference: &Ref) -> assertd_trust::Result<Option<Assertion>> {
        self.0
            .get(reference.assertion_type, &reference.primary_key)
            .await
            .map_err(|e| TrustError::Lookup(e.to_string()))
    }
}
