//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: signing authorities that build
//! well-formed assertions, and a database bootstrapped with a trusted root.

use rand::Rng;

use assertd::{Database, DatabaseConfig};
use assertd_core::{sha3_384_digest, Assertion, AssertionBuilder, AssertionType, Keypair};
use assertd_store::{Backstore, MemoryBackstore};

/// Timestamp used by every fixture assertion.
pub const TIMESTAMP: &str = "2016-01-02T10:00:00Z";

/// Account id of the fixture's trusted root.
pub const ROOT_ACCOUNT: &str = "canonical";

/// An account together with its signing key.
#[derive(Debug)]
pub struct SigningAuthority {
    pub account_id: String,
    pub keypair: Keypair,
}

impl SigningAuthority {
    /// Create with a deterministic key from a one-byte seed.
    pub fn new(account_id: &str, seed: u8) -> Self {
        Self::with_seed(account_id, [seed; 32])
    }

    pub fn with_seed(account_id: &str, seed: [u8; 32]) -> Self {
        Self {
            account_id: account_id.to_string(),
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// Create with a random key.
    pub fn random(account_id: &str) -> Self {
        Self::with_seed(account_id, rand::thread_rng().gen())
    }

    /// The id of this authority's public key.
    pub fn key_id(&self) -> String {
        self.keypair.key_id()
    }

    /// Sign a builder as this authority.
    ///
    /// Panics if the builder is malformed.
    pub fn sign(&self, builder: AssertionBuilder) -> Assertion {
        builder
            .sign(&self.keypair, &self.account_id)
            .expect("fixture assertion must be well-formed")
    }

    /// A self-signed account assertion.
    pub fn account(&self) -> Assertion {
        self.account_for(self)
    }

    /// A self-signed account-key assertion.
    pub fn account_key(&self) -> Assertion {
        self.account_key_for(self)
    }

    /// An account assertion for `subject`, signed by this authority.
    pub fn account_for(&self, subject: &SigningAuthority) -> Assertion {
        self.sign(
            AssertionBuilder::new(AssertionType::Account)
                .header("account-id", &subject.account_id)
                .header("display-name", &subject.account_id)
                .header("validation", "verified")
                .header("timestamp", TIMESTAMP),
        )
    }

    /// An account-key assertion for `subject`'s key, valid from
    /// [`TIMESTAMP`] with no end.
    pub fn account_key_for(&self, subject: &SigningAuthority) -> Assertion {
        self.account_key_window(subject, TIMESTAMP, None)
    }

    /// An account-key assertion with an explicit validity window.
    pub fn account_key_window(
        &self,
        subject: &SigningAuthority,
        since: &str,
        until: Option<&str>,
    ) -> Assertion {
        let public_key = subject.keypair.public_key();
        let mut builder = AssertionBuilder::new(AssertionType::AccountKey)
            .header("account-id", &subject.account_id)
            .header("name", "default")
            .header("public-key-sha3-384", public_key.key_id())
            .header("since", since)
            .body(public_key.encode_body());
        if let Some(until) = until {
            builder = builder.header("until", until);
        }
        self.sign(builder)
    }

    pub fn enterprise_store(&self, operator_id: &str, store: &str, revision: u64) -> Assertion {
        self.enterprise_store_at(operator_id, store, revision, "https://store.example.com")
    }

    pub fn enterprise_store_at(
        &self,
        operator_id: &str,
        store: &str,
        revision: u64,
        address: &str,
    ) -> Assertion {
        self.sign(
            AssertionBuilder::new(AssertionType::EnterpriseStore)
                .header("operator-id", operator_id)
                .header("store", store)
                .header("address", address)
                .revision(revision),
        )
    }

    pub fn snap_declaration(&self, snap_id: &str, publisher_id: &str) -> Assertion {
        self.sign(
            AssertionBuilder::new(AssertionType::SnapDeclaration)
                .header("series", "16")
                .header("snap-id", snap_id)
                .header("snap-name", snap_id)
                .header("publisher-id", publisher_id)
                .header("timestamp", TIMESTAMP),
        )
    }

    /// A snap-revision for a snap file whose contents are `snap_id`.
    pub fn snap_revision(&self, snap_id: &str, developer_id: &str, revision: u64) -> Assertion {
        self.sign(
            AssertionBuilder::new(AssertionType::SnapRevision)
                .header("snap-sha3-384", sha3_384_digest(snap_id.as_bytes()))
                .header("snap-id", snap_id)
                .header("snap-size", "4096")
                .header("snap-revision", "1")
                .header("developer-id", developer_id)
                .header("timestamp", TIMESTAMP)
                .revision(revision),
        )
    }

    pub fn snap_build(&self, snap_id: &str) -> Assertion {
        self.sign(
            AssertionBuilder::new(AssertionType::SnapBuild)
                .header("snap-sha3-384", sha3_384_digest(snap_id.as_bytes()))
                .header("snap-id", snap_id)
                .header("snap-size", "4096")
                .header("grade", "stable")
                .header("timestamp", TIMESTAMP),
        )
    }
}

/// A database trusting a single root authority.
pub struct TestFixture<S: Backstore = MemoryBackstore> {
    pub root: SigningAuthority,
    pub db: Database<S>,
}

impl TestFixture {
    /// Create a fixture over an in-memory store.
    pub fn new() -> Self {
        Self::with_store(MemoryBackstore::new())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Backstore> TestFixture<S> {
    /// Create a fixture over the given store, checking key validity.
    pub fn with_store(store: S) -> Self {
        Self::open(store, true)
    }

    pub fn open(store: S, check_key_validity: bool) -> Self {
        let root = SigningAuthority::new(ROOT_ACCOUNT, 0x01);
        let config = DatabaseConfig {
            check_key_validity,
            ..DatabaseConfig::trusting(root_assertions(&root))
        };
        let db = Database::open(store, config).expect("fixture roots must be valid");
        Self { root, db }
    }

    /// Add the root-signed account and account-key for `party`.
    pub async fn register(&self, party: &SigningAuthority) {
        for assertion in [self.root.account_for(party), self.root.account_key_for(party)] {
            self.db
                .add(&assertion)
                .await
                .unwrap_or_else(|e| panic!("registering {}: {}", party.account_id, e));
        }
    }

    /// Create and register an untrusted account whose key is vouched for by
    /// the root.
    pub async fn third_party(&self, account_id: &str, seed: u8) -> SigningAuthority {
        let party = SigningAuthority::new(account_id, seed);
        self.register(&party).await;
        party
    }
}

/// The self-signed account and account-key of a root authority.
pub fn root_assertions(root: &SigningAuthority) -> Vec<Assertion> {
    vec![root.account(), root.account_key()]
}

/// Create multiple distinct authorities for multi-party tests.
pub fn parties(count: usize) -> Vec<SigningAuthority> {
    (0..count)
        .map(|i| {
            let mut seed = [0x80u8; 32];
            seed[0] = i as u8;
            SigningAuthority::with_seed(&format!("party-{}", i), seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertd::AddOutcome;

    #[tokio::test]
    async fn test_fixture_trusts_root() {
        let fixture = TestFixture::new();
        assert!(fixture.db.is_trusted_account(ROOT_ACCOUNT));
        assert_eq!(fixture.db.trust_roots().len(), 2);
    }

    #[tokio::test]
    async fn test_register_party() {
        let fixture = TestFixture::new();
        let party = SigningAuthority::new("dev-1", 7);
        fixture.register(&party).await;

        let key = fixture
            .db
            .find(AssertionType::AccountKey, &[party.key_id()])
            .await
            .unwrap();
        assert_eq!(key.as_account_key().unwrap().account_id(), "dev-1");
        assert!(!fixture.db.is_trusted_account("dev-1"));

        // A registered party may sign snap-builds.
        let build = party.snap_build("snap-id-1");
        fixture
            .db
            .add(&fixture.root.snap_declaration("snap-id-1", "dev-1"))
            .await
            .unwrap();
        assert_eq!(fixture.db.add(&build).await.unwrap(), AddOutcome::Inserted);
    }

    #[test]
    fn test_parties_are_distinct() {
        let parties = parties(3);
        let ids: Vec<_> = parties.iter().map(|p| p.key_id()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn test_random_authorities_differ() {
        let a = SigningAuthority::random("a");
        let b = SigningAuthority::random("a");
        assert_ne!(a.key_id(), b.key_id());
    }
}
