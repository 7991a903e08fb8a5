//! Strong type definitions for assertd.
//!
//! The set of assertion types is closed: every type the system accepts is a
//! variant of [`AssertionType`], and every variant has a static schema in
//! the [`registry`](crate::registry).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::{self, TypeDescriptor};

/// The kind of assertion, determining its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssertionType {
    /// An account identity.
    Account,
    /// A public key that an account signs with.
    AccountKey,
    /// Ownership of a store by an operator account.
    EnterpriseStore,
    /// The name and publisher of a snap.
    SnapDeclaration,
    /// A published revision of a snap, by content digest.
    SnapRevision,
    /// A build of a snap, attested by whoever built it.
    SnapBuild,
}

impl AssertionType {
    /// All registered types.
    pub const ALL: [AssertionType; 6] = [
        AssertionType::Account,
        AssertionType::AccountKey,
        AssertionType::EnterpriseStore,
        AssertionType::SnapDeclaration,
        AssertionType::SnapRevision,
        AssertionType::SnapBuild,
    ];

    /// The wire name used by the `type` header.
    pub fn name(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::AccountKey => "account-key",
            Self::EnterpriseStore => "enterprise-store",
            Self::SnapDeclaration => "snap-declaration",
            Self::SnapRevision => "snap-revision",
            Self::SnapBuild => "snap-build",
        }
    }

    /// Look up a type by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The static schema for this type.
    pub fn descriptor(self) -> &'static TypeDescriptor {
        registry::descriptor(self)
    }

    /// The headers forming the primary key, in order.
    pub fn primary_key(self) -> &'static [&'static str] {
        self.descriptor().primary_key
    }
}

impl fmt::Display for AssertionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference to an assertion by type and primary key.
///
/// This is a lookup key, never a handle: resolving it always goes through
/// the database, which holds the current revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "type")]
    pub assertion_type: AssertionType,
    pub primary_key: Vec<String>,
}

impl Ref {
    pub fn new<I, S>(assertion_type: AssertionType, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assertion_type,
            primary_key: primary_key.into_iter().map(Into::into).collect(),
        }
    }

    /// Describe the primary key as `name "value"` pairs joined by ` and `.
    ///
    /// Returns `None` if the key does not have the arity of its type.
    pub fn describe_key(&self) -> Option<String> {
        describe_primary_key(self.assertion_type, &self.primary_key)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.assertion_type, self.primary_key.join("/"))
    }
}

/// Render a primary key for messages, e.g. `operator-id "op-id1" and store "store1"`.
pub fn describe_primary_key(assertion_type: AssertionType, values: &[String]) -> Option<String> {
    let names = assertion_type.primary_key();
    if names.len() != values.len() {
        return None;
    }
    let parts: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{} {:?}", name, value))
        .collect();
    Some(parts.join(" and "))
}
