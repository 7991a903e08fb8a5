//! Error types for the database.

use assertd_core::{AssertionType, DecodeError, Ref, ValidationError};
use assertd_store::StoreError;
use assertd_trust::{AuthorityError, PrerequisiteError, SignatureError, TrustError};
use thiserror::Error;

/// Errors that can occur during database operations.
///
/// Decoding, validation and trust failures display their own message
/// unchanged.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The envelope could not be parsed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The headers do not fit the type's schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),

    /// A lower revision than the stored one was added.
    #[error(
        "revision {revision} of {assertion_type} assertion for {description} is older than the current revision {current}"
    )]
    RevisionConflict {
        assertion_type: AssertionType,
        description: String,
        revision: u64,
        current: u64,
    },

    /// The assertion would replace a trusted one.
    #[error("cannot add {assertion_type} assertion for {description}: it is a trusted assertion")]
    Trusted {
        assertion_type: AssertionType,
        description: String,
    },

    /// No assertion with this type and primary key.
    #[error("assertion not found: {0}")]
    NotFound(Ref),

    /// Invalid database configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A lookup during trust checks failed.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl From<TrustError> for DatabaseError {
    fn from(err: TrustError) -> Self {
        match err {
            TrustError::Signature(e) => Self::Signature(e),
            TrustError::Authority(e) => Self::Authority(e),
            TrustError::Prerequisite(e) => Self::Prerequisite(e),
            e @ TrustError::UnsupportedRoot(_) => Self::Config(e.to_string()),
            TrustError::Lookup(msg) => Self::Lookup(msg),
        }
    }
}

impl DatabaseError {
    /// Whether the error is a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
