//! Signature verification.
//!
//! The signing key is named by the `sign-key-sha3-384` header and resolved
//! to an `account-key` assertion, first among the trust roots and then
//! through the lookup. Checks run in a fixed order:
//!
//! 1. the key is known
//! 2. the key belongs to the assertion's authority
//! 3. the key is valid at check time (optional)
//! 4. the signature packet is well-formed
//! 5. the Ed25519 signature matches the content bytes

use chrono::{DateTime, Utc};

use assertd_core::{AccountKey, Assertion, AssertionType, Ed25519Signature, Ref};

use crate::error::{Result, SignatureError};
use crate::roots::{AssertionLookup, TrustRoots};

/// When to consider a signing key valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValidity {
    /// The key must be valid at this instant.
    At(DateTime<Utc>),
    /// Skip the validity window.
    Unchecked,
}

impl KeyValidity {
    /// Check against the current time.
    pub fn now() -> Self {
        Self::At(Utc::now())
    }
}

/// Resolve the account-key that signed an assertion.
pub async fn resolve_signing_key<L>(
    assertion: &Assertion,
    roots: &TrustRoots,
    lookup: &L,
) -> Result<AccountKey>
where
    L: AssertionLookup + ?Sized,
{
    let key_id = assertion.sign_key_id();
    if let Some(key) = roots.account_key(key_id) {
        return Ok(key.clone());
    }

    let reference = Ref::new(AssertionType::AccountKey, [key_id]);
    match lookup.lookup(&reference).await? {
        Some(Assertion::AccountKey(key)) => Ok(key),
        _ => Err(SignatureError::UnknownKey {
            key_id: key_id.to_string(),
            authority_id: assertion.authority_id().to_string(),
        }
        .into()),
    }
}

/// Verify an assertion's signature with a resolved key.
pub fn verify_with_key(
    assertion: &Assertion,
    key: &AccountKey,
    validity: KeyValidity,
) -> std::result::Result<(), SignatureError> {
    if key.account_id() != assertion.authority_id() {
        return Err(SignatureError::WrongOwner {
            key_id: key.public_key_id().to_string(),
            owner: key.account_id().to_string(),
            authority_id: assertion.authority_id().to_string(),
        });
    }

    if let KeyValidity::At(t) = validity {
        if !key.is_valid_at(t) {
            return Err(SignatureError::ExpiredKey {
                key_id: key.public_key_id().to_string(),
                owner: key.account_id().to_string(),
            });
        }
    }

    let signature = Ed25519Signature::from_packet(assertion.signature())
        .map_err(|_| SignatureError::UnsupportedFormat)?;

    key.public_key()
        .verify(assertion.content(), &signature)
        .map_err(|_| SignatureError::Failed)
}

/// Resolve the signing key and verify the signature.
pub async fn verify_signature<L>(
    assertion: &Assertion,
    roots: &TrustRoots,
    lookup: &L,
    validity: KeyValidity,
) -> Result<()>
where
    L: AssertionLookup + ?Sized,
{
    let key = resolve_signing_key(assertion, roots, lookup).await?;
    verify_with_key(assertion, &key, validity)?;
    Ok(())
}
