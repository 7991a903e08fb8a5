//! Error types for the trust module.
//!
//! Messages name the assertion type and identity so that a rejected
//! assertion can be traced back without the document at hand.

use thiserror::Error;

use assertd_core::AssertionType;

/// The signature of an assertion could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No account-key is known for the signing key id.
    #[error("no matching public key {key_id:?} for signature by {authority_id:?}")]
    UnknownKey { key_id: String, authority_id: String },

    /// The signing key belongs to another account.
    #[error("signing key {key_id:?} belongs to {owner:?}, not to authority {authority_id:?}")]
    WrongOwner {
        key_id: String,
        owner: String,
        authority_id: String,
    },

    /// The signing key is outside its validity window.
    #[error("assertion is signed with expired public key {key_id:?} from {owner:?}")]
    ExpiredKey { key_id: String, owner: String },

    /// The signature trailer is not a known packet format.
    #[error("unsupported signature format")]
    UnsupportedFormat,

    /// The signature does not match the content.
    #[error("failed signature verification")]
    Failed,
}

/// The signer is not allowed to sign this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error(
        "{assertion_type} assertion for {description} is not signed by a directly trusted authority: {authority_id}"
    )]
    NotDirectlyTrusted {
        assertion_type: AssertionType,
        description: String,
        authority_id: String,
    },
}

/// A referenced assertion is not known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrerequisiteError {
    #[error(
        "{assertion_type} assertion for {description} does not have a matching {missing_type} assertion for the {role} {value:?}"
    )]
    Missing {
        assertion_type: AssertionType,
        description: String,
        missing_type: AssertionType,
        role: &'static str,
        value: String,
    },
}

/// Errors that can occur during trust checks.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),

    /// Only accounts and account keys can be trust roots.
    #[error("{0} assertions cannot be trust roots")]
    UnsupportedRoot(AssertionType),

    /// The backing lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Result type for trust operations.
pub type Result<T> = std::result::Result<T, TrustError>;
