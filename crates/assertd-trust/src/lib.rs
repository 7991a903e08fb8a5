//! # assertd trust
//!
//! Decides whether a structurally valid assertion can be believed.
//!
//! ## Overview
//!
//! Trust is established by three independent checks, run in this order:
//!
//! 1. **Signature**: the signing key resolves to an `account-key` owned by
//!    the assertion's authority, and the Ed25519 signature covers the
//!    content bytes.
//! 2. **Authority**: reserved types are signed by a directly trusted
//!    account from the [`TrustRoots`].
//! 3. **Prerequisites**: every assertion the document references is known.
//!
//! Lookups go through the [`AssertionLookup`] trait, so the checks work
//! against any backing store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use assertd_trust::{check_assertion, KeyValidity, TrustRoots};
//! use assertd_core::Assertion;
//!
//! async fn example(roots: TrustRoots, assertion: Assertion) {
//!     // The roots double as a lookup when nothing else is stored.
//!     check_assertion(&assertion, &roots, &roots, KeyValidity::now())
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod authority;
pub mod error;
pub mod prereq;
pub mod roots;
pub mod signature;

pub use authority::check_authority;
pub use error::{AuthorityError, PrerequisiteError, Result, SignatureError, TrustError};
pub use prereq::check_prerequisites;
pub use roots::{AssertionLookup, TrustRoots};
pub use signature::{resolve_signing_key, verify_signature, verify_with_key, KeyValidity};

use assertd_core::Assertion;

/// Run signature, authority and prerequisite checks in order.
pub async fn check_assertion<L>(
    assertion: &Assertion,
    roots: &TrustRoots,
    lookup: &L,
    validity: KeyValidity,
) -> Result<()>
where
    L: AssertionLookup + ?Sized,
{
    verify_signature(assertion, roots, lookup, validity).await?;
    check_authority(assertion, roots)?;
    check_prerequisites(assertion, roots, lookup).await
}
