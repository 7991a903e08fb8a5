//! Authority checks.
//!
//! Reserved types may only be signed by a directly trusted authority. No
//! delegation chain is walked. Types open to any account pass here and
//! rely on signature and prerequisite checks instead.

use assertd_core::{Assertion, SignerPolicy};

use crate::error::AuthorityError;
use crate::roots::TrustRoots;

/// Check that the assertion's authority may sign its type.
pub fn check_authority(assertion: &Assertion, roots: &TrustRoots) -> Result<(), AuthorityError> {
    match assertion.descriptor().signer {
        SignerPolicy::AnyAccount => Ok(()),
        SignerPolicy::DirectlyTrusted if roots.is_trusted_account(assertion.authority_id()) => {
            Ok(())
        }
        SignerPolicy::DirectlyTrusted => Err(AuthorityError::NotDirectlyTrusted {
            assertion_type: assertion.assertion_type(),
            description: assertion.describe(),
            authority_id: assertion.authority_id().to_string(),
        }),
    }
}
