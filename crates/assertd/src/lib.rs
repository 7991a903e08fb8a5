//! # assertd
//!
//! A database of signed assertions: small text documents with headers, an
//! optional body and an Ed25519 signature, checked against explicitly
//! configured trust roots before they are stored.
//!
//! ## Overview
//!
//! - **Assertion**: An immutable signed document of a known type, identified
//!   by its type and primary key.
//! - **Revision**: A higher revision replaces a lower one for the same
//!   primary key. Lower revisions are rejected.
//! - **Trust roots**: `account` and `account-key` assertions accepted without
//!   checks at open time. Their accounts are the directly trusted
//!   authorities.
//! - **Prerequisites**: Assertions an assertion refers to, which must be
//!   known before it is accepted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use assertd::{Database, DatabaseConfig};
//! use assertd::store::SqliteBackstore;
//! use assertd::core::Assertion;
//!
//! async fn example(roots: Vec<Assertion>, encoded: &[u8]) {
//!     let store = SqliteBackstore::open("assertions.db").unwrap();
//!     let db = Database::open(store, DatabaseConfig::trusting(roots)).unwrap();
//!
//!     // Decode, check and store.
//!     let (assertion, outcome) = db.add_bytes(encoded).await.unwrap();
//!     println!("{}: {:?}", assertion.to_ref(), outcome);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `assertd::core` - Codec, type registry and typed assertions
//! - `assertd::store` - Backstore abstraction, in-memory and SQLite
//! - `assertd::trust` - Signature, authority and prerequisite checks

pub mod config;
pub mod database;
pub mod error;

pub use assertd_core as core;
pub use assertd_store as store;
pub use assertd_trust as trust;

pub use config::DatabaseConfig;
pub use database::{AddOutcome, Database};
pub use error::{DatabaseError, Result};

pub use assertd_core::{
    decode, Assertion, AssertionBuilder, AssertionType, Keypair, Prerequisite, Ref,
};
