//! Error types for assertd core.

use std::fmt;

use thiserror::Error;

use crate::types::AssertionType;

/// Errors raised while parsing the text envelope of an assertion.
///
/// These are structural: they say nothing about whether the headers make
/// sense for the assertion type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("assertion content/signature separator not found")]
    MissingSignatureSeparator,

    #[error("assertion header block is not valid UTF-8")]
    HeadersNotUtf8,

    #[error("header entry missing ':' separator: {0:?}")]
    MissingColon(String),

    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("header entry should have a space before value: {0:?}")]
    MissingSpace(String),

    #[error("repeated assertion header: {0:?}")]
    RepeatedHeader(String),

    #[error("\"body-length\" header is not an integer: {0}")]
    InvalidBodyLength(String),

    #[error("assertion body length and declared body-length don't match: {actual} != {declared}")]
    BodyLengthMismatch { actual: usize, declared: usize },

    #[error("empty assertion signature")]
    EmptySignature,

    #[error("assertion signature is not valid base64: {0}")]
    InvalidSignature(String),
}

/// A header-level validation failure.
///
/// Displays as `assertion <type>: <message>` for type-specific failures and
/// `assertion: <message>` for failures in the common headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The assertion type, when it was known at the time of failure.
    pub assertion_type: Option<AssertionType>,
    /// The failure, naming the offending header.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn common(message: impl Into<String>) -> Self {
        Self {
            assertion_type: None,
            message: message.into(),
        }
    }

    pub(crate) fn typed(assertion_type: AssertionType, message: impl Into<String>) -> Self {
        Self {
            assertion_type: Some(assertion_type),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.assertion_type {
            Some(t) => write!(f, "assertion {}: {}", t, self.message),
            None => write!(f, "assertion: {}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Core errors covering decoding, classification, and signing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("unsupported signature format")]
    UnsupportedSignatureFormat,

    #[error("encoding error: {0}")]
    EncodingError(String),
}
