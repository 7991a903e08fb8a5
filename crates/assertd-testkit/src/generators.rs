//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use assertd_core::{Assertion, AssertionBuilder, AssertionType, Ed25519PublicKey, Keypair};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Ed25519PublicKey.
pub fn public_key() -> impl Strategy<Value = Ed25519PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate an account id.
pub fn account_id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate a header value with no surrounding whitespace or newlines.
pub fn header_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._:/-]{1,32}".prop_map(String::from)
}

/// Generate a header name outside every type's schema.
pub fn extra_header_name() -> impl Strategy<Value = String> {
    "x-[a-z][a-z0-9]{0,8}".prop_map(String::from)
}

/// Generate a revision.
pub fn revision() -> impl Strategy<Value = u64> {
    0u64..=1000u64
}

/// Parameters for generating an enterprise-store assertion.
#[derive(Debug, Clone)]
pub struct EnterpriseStoreParams {
    pub seed: [u8; 32],
    pub authority_id: String,
    pub operator_id: String,
    pub store: String,
    pub revision: u64,
    pub extra: BTreeMap<String, String>,
}

impl EnterpriseStoreParams {
    pub fn keypair(&self) -> Keypair {
        Keypair::from_seed(&self.seed)
    }

    /// The address header derived from the store name.
    pub fn address(&self) -> String {
        format!("https://{}.example.com/api", self.store)
    }
}

impl Arbitrary for EnterpriseStoreParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(),
            account_id(),
            account_id(),
            "[a-z][a-z0-9]{0,15}",
            revision(),
            prop::collection::btree_map(extra_header_name(), header_value(), 0..4),
        )
            .prop_map(
                |(seed, authority_id, operator_id, store, revision, extra)| EnterpriseStoreParams {
                    seed,
                    authority_id,
                    operator_id,
                    store,
                    revision,
                    extra,
                },
            )
            .boxed()
    }
}

/// Build the unsigned builder for a set of parameters.
///
/// Extra headers are added in reverse order when `reversed` is set.
pub fn enterprise_store_builder(params: &EnterpriseStoreParams, reversed: bool) -> AssertionBuilder {
    let mut builder = AssertionBuilder::new(AssertionType::EnterpriseStore).revision(params.revision);
    let extra: Vec<_> = if reversed {
        params.extra.iter().rev().collect()
    } else {
        params.extra.iter().collect()
    };
    for (name, value) in extra {
        builder = builder.header(name, value);
    }
    builder
        .header("operator-id", &params.operator_id)
        .header("store", &params.store)
        .header("address", params.address())
}

/// Sign an enterprise-store assertion from parameters.
pub fn enterprise_store_from_params(params: &EnterpriseStoreParams) -> Assertion {
    enterprise_store_builder(params, false)
        .sign(&params.keypair(), &params.authority_id)
        .expect("generated parameters must be well-formed")
}
