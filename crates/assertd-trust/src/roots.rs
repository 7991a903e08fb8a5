//! Bootstrap trust roots.
//!
//! Trust starts from a fixed set of `account` and `account-key` assertions
//! supplied when a database is opened. The accounts they name are the
//! directly trusted authorities, and their keys verify everything signed by
//! those authorities.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use assertd_core::{AccountKey, Assertion, AssertionType, Ref};

use crate::error::{Result, TrustError};

/// Looks up the current revision of an assertion by reference.
#[async_trait]
pub trait AssertionLookup: Send + Sync {
    async fn lookup(&self, reference: &Ref) -> Result<Option<Assertion>>;
}

/// The bootstrap-trusted assertions.
#[derive(Debug, Clone, Default)]
pub struct TrustRoots {
    assertions: BTreeMap<Ref, Assertion>,
    accounts: BTreeSet<String>,
}

impl TrustRoots {
    /// Create an empty set. Nothing reserved can be added against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build trust roots from trusted `account` and `account-key`
    /// assertions.
    pub fn from_assertions(trusted: impl IntoIterator<Item = Assertion>) -> Result<Self> {
        let mut roots = Self::new();
        for assertion in trusted {
            let account_id = match &assertion {
                Assertion::Account(a) => a.account_id().to_string(),
                Assertion::AccountKey(k) => k.account_id().to_string(),
                other => return Err(TrustError::UnsupportedRoot(other.assertion_type())),
            };
            roots.accounts.insert(account_id);
            roots.assertions.insert(assertion.to_ref(), assertion);
        }
        Ok(roots)
    }

    /// Whether an account is a directly trusted authority.
    pub fn is_trusted_account(&self, account_id: &str) -> bool {
        self.accounts.contains(account_id)
    }

    /// The directly trusted account ids.
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(String::as_str)
    }

    pub fn get(&self, reference: &Ref) -> Option<&Assertion> {
        self.assertions.get(reference)
    }

    pub fn find(&self, assertion_type: AssertionType, primary_key: &[String]) -> Option<&Assertion> {
        self.get(&Ref::new(assertion_type, primary_key.iter().cloned()))
    }

    /// A trusted account-key by key id.
    pub fn account_key(&self, key_id: &str) -> Option<&AccountKey> {
        self.get(&Ref::new(AssertionType::AccountKey, [key_id]))
            .and_then(Assertion::as_account_key)
    }

    pub fn contains(&self, reference: &Ref) -> bool {
        self.assertions.contains_key(reference)
    }

    /// Trusted assertions ordered by reference.
    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions.values()
    }

    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }
}

#[async_trait]
impl AssertionLookup for TrustRoots {
    async fn lookup(&self, reference: &Ref) -> Result<Option<Assertion>> {
        Ok(self.get(reference).cloned())
    }
}
