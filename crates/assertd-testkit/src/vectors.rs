//! Golden test vectors for deterministic encoding.
//!
//! Each vector fixes a seed, a type and a set of headers. Building it must
//! yield byte-identical envelopes on every implementation, since header
//! order is canonical and Ed25519 signatures are deterministic.

use serde::{Deserialize, Serialize};

use assertd_core::{Assertion, AssertionBuilder, AssertionType, Keypair};

/// Key id of the `[0x01; 32]` seed.
pub const SEED_01_KEY_ID: &str =
    "gNHuKKa0cDINgGHsxaj1LtsBa-GdmLV9Y8_Xx9PXGVKklrS0jE4dYoLqBe2gQgrK";

/// Account-key body of the `[0x01; 32]` seed.
pub const SEED_01_KEY_BODY: &str = "AYqI4910CfGV/VLbLTy6XXLKZwm/HZQSG/N0iAG0D29c";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    pub authority_id: &'static str,
    pub assertion_type: AssertionType,
    pub revision: u64,
    /// Headers in deliberately non-canonical order.
    pub headers: &'static [(&'static str, &'static str)],
    pub body: Option<&'static str>,
    /// Expected signature trailer, when pinned.
    pub expected_signature: Option<&'static str>,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "enterprise-store",
            seed: [0x01; 32],
            authority_id: "canonical",
            assertion_type: AssertionType::EnterpriseStore,
            revision: 0,
            headers: &[
                ("address", "https://store.example.com"),
                ("store", "store1"),
                ("operator-id", "op-id1"),
            ],
            body: None,
            expected_signature: Some(
                "AXzS5SPzYMQyj+Nx+EJ+CRI4am3K3z5fYEYaxLFqVIEbOnJnLuvQnr/vSgODNVPBAd3fsXyYMkUTUVIiqY5YQgs=",
            ),
        },
        GoldenVector {
            name: "self-signed account-key",
            seed: [0x01; 32],
            authority_id: "canonical",
            assertion_type: AssertionType::AccountKey,
            revision: 0,
            headers: &[
                ("since", "2016-01-02T10:00:00Z"),
                ("name", "root"),
                ("account-id", "canonical"),
                ("public-key-sha3-384", SEED_01_KEY_ID),
            ],
            body: Some(SEED_01_KEY_BODY),
            expected_signature: Some(
                "AW4xBX4jj6G7M9msmlcFoH6ZcNOSL/i5gOM50zYKUIFPjrZw/o0rNvkmsnWAPqPiRMZq6V4qI2X92tt5K/uwgwg=",
            ),
        },
        GoldenVector {
            name: "account with revision",
            seed: [0x02; 32],
            authority_id: "canonical",
            assertion_type: AssertionType::Account,
            revision: 3,
            headers: &[
                ("timestamp", "2016-01-02T10:00:00Z"),
                ("validation", "unproven"),
                ("username", "dev"),
                ("display-name", "Developer One"),
                ("account-id", "dev-1"),
            ],
            body: None,
            expected_signature: None,
        },
        GoldenVector {
            name: "snap-build with extra header",
            seed: [0x03; 32],
            authority_id: "dev-1",
            assertion_type: AssertionType::SnapBuild,
            revision: 0,
            headers: &[
                ("x-builder", "ci-7"),
                ("grade", "devel"),
                ("timestamp", "2016-01-02T10:00:00Z"),
                ("snap-size", "4096"),
                ("snap-id", "snap-id-1"),
                ("snap-sha3-384", SEED_01_KEY_ID),
            ],
            body: None,
            expected_signature: None,
        },
    ]
}

/// Generate an assertion from a golden vector.
pub fn generate_assertion_from_vector(vector: &GoldenVector) -> Assertion {
    let keypair = Keypair::from_seed(&vector.seed);
    let mut builder = AssertionBuilder::new(vector.assertion_type).revision(vector.revision);
    for (name, value) in vector.headers {
        builder = builder.header(*name, *value);
    }
    if let Some(body) = vector.body {
        builder = builder.body(body);
    }
    builder
        .sign(&keypair, vector.authority_id)
        .unwrap_or_else(|e| panic!("vector {:?}: {}", vector.name, e))
}

/// The derived outputs of a vector, for export to other implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorOutput {
    pub name: String,
    /// 32 bytes hex.
    pub seed: String,
    pub key_id: String,
    pub assertion_type: String,
    /// The full envelope as text.
    pub encoded: String,
    /// Blake3 of the envelope, hex.
    pub digest: String,
}

impl VectorOutput {
    pub fn from_vector(vector: &GoldenVector) -> Self {
        let assertion = generate_assertion_from_vector(vector);
        Self {
            name: vector.name.to_string(),
            seed: hex::encode(vector.seed),
            key_id: assertion.sign_key_id().to_string(),
            assertion_type: vector.assertion_type.to_string(),
            encoded: String::from_utf8_lossy(&assertion.encode()).into_owned(),
            digest: assertion.digest().to_hex(),
        }
    }
}

/// Export every vector as pretty-printed JSON.
pub fn export_json() -> serde_json::Result<String> {
    let outputs: Vec<VectorOutput> = all_vectors().iter().map(VectorOutput::from_vector).collect();
    serde_json::to_string_pretty(&outputs)
}

/// Check every pinned vector against its expected signature.
///
/// Returns `(name, matches, actual trailer)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let encoded = String::from_utf8_lossy(&generate_assertion_from_vector(v).encode())
                .into_owned();
            let trailer = encoded.rsplit("\n\n").next().unwrap_or_default().to_string();
            let matches = v.expected_signature.map_or(true, |s| s == trailer);
            (v.name.to_string(), matches, trailer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector {:?} produced {}", name, actual);
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let a1 = generate_assertion_from_vector(&vector);
            let a2 = generate_assertion_from_vector(&vector);
            assert_eq!(
                a1.encode(),
                a2.encode(),
                "vector {:?} produced different bytes on regeneration",
                vector.name
            );
        }
    }

    #[test]
    fn test_seed_01_constants() {
        let keypair = Keypair::from_seed(&[0x01; 32]);
        assert_eq!(keypair.key_id(), SEED_01_KEY_ID);
        assert_eq!(keypair.public_key().encode_body(), SEED_01_KEY_BODY);
    }

    #[test]
    fn test_export_round_trips_through_json() {
        let json = export_json().unwrap();
        let parsed: Vec<VectorOutput> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), all_vectors().len());
        for output in &parsed {
            let decoded = Assertion::decode(output.encoded.as_bytes()).unwrap();
            assert_eq!(decoded.sign_key_id(), output.key_id);
            assert_eq!(decoded.assertion_type().to_string(), output.assertion_type);
        }
    }

    #[test]
    fn test_different_seeds_different_signatures() {
        let mut vector = all_vectors().remove(0);
        let a1 = generate_assertion_from_vector(&vector);
        vector.seed = [0x09; 32];
        let a2 = generate_assertion_from_vector(&vector);
        assert_ne!(a1.signature(), a2.signature());
        assert_ne!(a1.sign_key_id(), a2.sign_key_id());
    }
}
