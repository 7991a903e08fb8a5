//! # assertd core
//!
//! Pure primitives for assertd: the assertion envelope, the type registry,
//! typed assertions and local signing.
//!
//! This crate contains no I/O, no storage, no trust decisions. It turns
//! bytes into validated, typed assertions and back.
//!
//! ## Key Types
//!
//! - [`Assertion`] - A classified, typed assertion
//! - [`RawAssertion`] - A decoded but unclassified envelope
//! - [`AssertionType`] - The closed set of registered types
//! - [`Ref`] - Lookup key by type and primary key
//! - [`AssertionBuilder`] - Canonical rendering and signing
//!
//! ## Pipeline
//!
//! [`codec::decode`] checks the envelope, then [`registry::classify`]
//! checks headers against the static schema for the type. [`decode`] runs
//! both.

pub mod assertion;
pub mod builder;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod registry;
pub mod types;
pub mod validators;

pub use assertion::{
    Account, AccountKey, Assertion, Common, EnterpriseStore, Prerequisite, SnapBuild,
    SnapDeclaration, SnapRevision, DEFAULT_SERIES,
};
pub use builder::AssertionBuilder;
pub use codec::{Headers, RawAssertion};
pub use crypto::{
    decode_public_key, encode_public_key, sha3_384_digest, Blake3Hash, Ed25519PublicKey,
    Ed25519Signature, Keypair,
};
pub use error::{CoreError, DecodeError, ValidationError};
pub use registry::{classify, descriptor, BodyPolicy, Presence, SignerPolicy, TypeDescriptor};
pub use types::{AssertionType, Ref};

/// Decode and classify an encoded assertion.
pub fn decode(data: &[u8]) -> Result<Assertion, CoreError> {
    Assertion::decode(data)
}
