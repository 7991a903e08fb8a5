//! # assertd testkit
//!
//! Testing utilities for assertd.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with pinned envelopes for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Signing authorities and a database bootstrapped with a trusted root
//!
//! ## Golden Vectors
//!
//! ```rust
//! use assertd_testkit::vectors::{all_vectors, generate_assertion_from_vector};
//!
//! for vector in all_vectors() {
//!     let assertion = generate_assertion_from_vector(&vector);
//!     println!("{}: {}", vector.name, assertion.digest().to_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use assertd_testkit::generators::{EnterpriseStoreParams, enterprise_store_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn encoding_is_deterministic(params: EnterpriseStoreParams) {
//!         let a1 = enterprise_store_from_params(&params);
//!         let a2 = enterprise_store_from_params(&params);
//!         prop_assert_eq!(a1.encode(), a2.encode());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use assertd_testkit::fixtures::{SigningAuthority, TestFixture};
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let dev = SigningAuthority::new("dev-1", 7);
//! fixture.register(&dev).await;
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{parties, SigningAuthority, TestFixture};
