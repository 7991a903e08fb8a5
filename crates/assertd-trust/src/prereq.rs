//! Prerequisite checks.
//!
//! Every reference an assertion makes must resolve, among the trust roots
//! or through the lookup, before it is accepted. Only presence is checked;
//! the referenced assertions were validated when they were added.

use assertd_core::Assertion;

use crate::error::{PrerequisiteError, Result};
use crate::roots::{AssertionLookup, TrustRoots};

/// Check that all prerequisites of an assertion are known.
///
/// Fails on the first missing prerequisite, in declaration order.
pub async fn check_prerequisites<L>(
    assertion: &Assertion,
    roots: &TrustRoots,
    lookup: &L,
) -> Result<()>
where
    L: AssertionLookup + ?Sized,
{
    for prerequisite in assertion.required_prerequisites() {
        if roots.contains(&prerequisite.reference) {
            continue;
        }
        if lookup.lookup(&prerequisite.reference).await?.is_some() {
            continue;
        }
        return Err(PrerequisiteError::Missing {
            assertion_type: assertion.assertion_type(),
            description: assertion.describe(),
            missing_type: prerequisite.reference.assertion_type,
            role: prerequisite.role,
            value: prerequisite.value().to_string(),
        }
        .into());
    }
    Ok(())
}
