//! Typed assertions.
//!
//! An [`Assertion`] is a classified document: one variant per registered
//! type, each keeping the decoded envelope alongside its parsed fields.
//! Values are immutable once built. A change to the same fact is a new
//! assertion with a higher revision.

use chrono::{DateTime, Utc};
use url::Url;

use crate::codec::{self, Headers, RawAssertion};
use crate::crypto::{Blake3Hash, Ed25519PublicKey};
use crate::error::{CoreError, ValidationError};
use crate::registry::{self, TypeDescriptor, AUTHORITY_ID_HEADER, SIGN_KEY_HEADER};
use crate::types::{describe_primary_key, AssertionType, Ref};
use crate::validators::{parse_timestamp, parse_uint};

/// The series snap revisions and builds refer to.
pub const DEFAULT_SERIES: &str = "16";

/// Fields shared by every assertion type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    raw: RawAssertion,
    assertion_type: AssertionType,
    revision: u64,
    primary_key: Vec<String>,
}

impl Common {
    pub(crate) fn new(
        raw: RawAssertion,
        assertion_type: AssertionType,
        revision: u64,
        primary_key: Vec<String>,
    ) -> Self {
        Self {
            raw,
            assertion_type,
            revision,
            primary_key,
        }
    }

    /// The decoded envelope.
    pub fn raw(&self) -> &RawAssertion {
        &self.raw
    }

    pub fn assertion_type(&self) -> AssertionType {
        self.assertion_type
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn authority_id(&self) -> &str {
        self.required(AUTHORITY_ID_HEADER)
    }

    /// The key id of the signing key.
    pub fn sign_key_id(&self) -> &str {
        self.required(SIGN_KEY_HEADER)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.header(name)
    }

    pub fn headers(&self) -> &Headers {
        self.raw.headers()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.raw.body()
    }

    /// The signed bytes.
    pub fn content(&self) -> &[u8] {
        self.raw.content()
    }

    /// The signature packet from the trailer.
    pub fn signature(&self) -> &[u8] {
        self.raw.signature()
    }

    pub fn to_ref(&self) -> Ref {
        Ref::new(self.assertion_type, self.primary_key.iter().cloned())
    }

    /// The primary key as `name "value"` pairs joined by ` and `.
    pub fn describe(&self) -> String {
        describe_primary_key(self.assertion_type, &self.primary_key).unwrap_or_default()
    }

    // Mandatory headers are present once the registry has accepted the
    // document.
    fn required(&self, name: &str) -> &str {
        self.raw.header(name).unwrap_or_default()
    }

    fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, String> {
        let value = self.required(name);
        parse_timestamp(value)
            .ok_or_else(|| format!("{:?} header is not a RFC3339 date: {}", name, value))
    }

    fn optional_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, String> {
        match self.header(name) {
            Some(_) => self.timestamp(name).map(Some),
            None => Ok(None),
        }
    }

    fn uint(&self, name: &str) -> Result<u64, String> {
        let value = self.required(name);
        parse_uint(value).ok_or_else(|| format!("{:?} header is not an integer: {}", name, value))
    }
}

/// A prerequisite of an assertion, with the role the referenced
/// assertion plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    pub reference: Ref,
    /// How the referenced assertion relates, e.g. `operator`.
    pub role: &'static str,
}

impl Prerequisite {
    fn new(reference: Ref, role: &'static str) -> Self {
        Self { reference, role }
    }

    fn account(account_id: &str, role: &'static str) -> Self {
        Self::new(Ref::new(AssertionType::Account, [account_id]), role)
    }

    fn snap_declaration(snap_id: &str) -> Self {
        Self::new(
            Ref::new(AssertionType::SnapDeclaration, [DEFAULT_SERIES, snap_id]),
            "snap",
        )
    }

    /// The identifying value quoted in messages: the last primary key
    /// component of the reference.
    pub fn value(&self) -> &str {
        self.reference
            .primary_key
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// An account identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    common: Common,
    timestamp: DateTime<Utc>,
}

impl Account {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let timestamp = common.timestamp("timestamp")?;
        Ok(Self { common, timestamp })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn account_id(&self) -> &str {
        self.common.required("account-id")
    }

    pub fn display_name(&self) -> &str {
        self.common.required("display-name")
    }

    pub fn username(&self) -> Option<&str> {
        self.common.header("username")
    }

    /// One of `unproven`, `verified`, `starred` or `unknown`.
    pub fn validation(&self) -> &str {
        self.common.required("validation")
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A public key held by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKey {
    common: Common,
    public_key: Ed25519PublicKey,
    since: DateTime<Utc>,
    until: Option<DateTime<Utc>>,
}

impl AccountKey {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let body = common.body().unwrap_or_default();
        let public_key = Ed25519PublicKey::decode_body(body)
            .map_err(|e| format!("cannot decode public key: {}", e))?;
        if public_key.key_id() != common.required("public-key-sha3-384") {
            return Err("public key does not match provided key id".into());
        }

        let since = common.timestamp("since")?;
        let until = common.optional_timestamp("until")?;
        if until.is_some_and(|until| until <= since) {
            return Err("\"until\" header must be after \"since\"".into());
        }

        Ok(Self {
            common,
            public_key,
            since,
            until,
        })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    /// The account that owns this key.
    pub fn account_id(&self) -> &str {
        self.common.required("account-id")
    }

    pub fn name(&self) -> &str {
        self.common.required("name")
    }

    pub fn public_key_id(&self) -> &str {
        self.common.required("public-key-sha3-384")
    }

    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// Whether the key may sign at the given time: `since <= t < until`.
    pub fn is_valid_at(&self, t: DateTime<Utc>) -> bool {
        self.since <= t && self.until.map_or(true, |until| t < until)
    }
}

/// A store owned by an operator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseStore {
    common: Common,
    address: Url,
}

impl EnterpriseStore {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let raw = common.required("address");
        let address = Url::parse(raw)
            .map_err(|_| format!("\"address\" header must be a valid URL: {}", raw))?;
        Ok(Self { common, address })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn operator_id(&self) -> &str {
        self.common.required("operator-id")
    }

    pub fn store(&self) -> &str {
        self.common.required("store")
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    /// The address exactly as written in the header.
    pub fn address_str(&self) -> &str {
        self.common.required("address")
    }
}

/// The name and publisher of a snap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapDeclaration {
    common: Common,
    timestamp: DateTime<Utc>,
}

impl SnapDeclaration {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let timestamp = common.timestamp("timestamp")?;
        Ok(Self { common, timestamp })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn series(&self) -> &str {
        self.common.required("series")
    }

    pub fn snap_id(&self) -> &str {
        self.common.required("snap-id")
    }

    pub fn snap_name(&self) -> &str {
        self.common.required("snap-name")
    }

    pub fn publisher_id(&self) -> &str {
        self.common.required("publisher-id")
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A published snap revision, identified by the digest of the snap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapRevision {
    common: Common,
    snap_size: u64,
    snap_revision: u64,
    timestamp: DateTime<Utc>,
}

impl SnapRevision {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let snap_size = common.uint("snap-size")?;
        let snap_revision = common.uint("snap-revision")?;
        let timestamp = common.timestamp("timestamp")?;
        Ok(Self {
            common,
            snap_size,
            snap_revision,
            timestamp,
        })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn snap_sha3_384(&self) -> &str {
        self.common.required("snap-sha3-384")
    }

    pub fn snap_id(&self) -> &str {
        self.common.required("snap-id")
    }

    pub fn snap_size(&self) -> u64 {
        self.snap_size
    }

    pub fn snap_revision(&self) -> u64 {
        self.snap_revision
    }

    pub fn developer_id(&self) -> &str {
        self.common.required("developer-id")
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A build of a snap, attested by the account that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapBuild {
    common: Common,
    snap_size: u64,
    timestamp: DateTime<Utc>,
}

impl SnapBuild {
    pub(crate) fn assemble(common: Common) -> Result<Self, String> {
        let snap_size = common.uint("snap-size")?;
        let timestamp = common.timestamp("timestamp")?;
        Ok(Self {
            common,
            snap_size,
            timestamp,
        })
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn snap_sha3_384(&self) -> &str {
        self.common.required("snap-sha3-384")
    }

    pub fn snap_id(&self) -> &str {
        self.common.required("snap-id")
    }

    pub fn snap_size(&self) -> u64 {
        self.snap_size
    }

    /// `stable` or `devel`.
    pub fn grade(&self) -> &str {
        self.common.required("grade")
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A classified assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    Account(Account),
    AccountKey(AccountKey),
    EnterpriseStore(EnterpriseStore),
    SnapDeclaration(SnapDeclaration),
    SnapRevision(SnapRevision),
    SnapBuild(SnapBuild),
}

impl Assertion {
    /// Decode and classify an encoded assertion.
    ///
    /// This checks structure only. Signatures, authority and prerequisites
    /// are checked when the assertion is added to a database.
    pub fn decode(data: &[u8]) -> Result<Self, CoreError> {
        let raw = codec::decode(data)?;
        Ok(registry::classify(raw)?)
    }

    /// Classify an already decoded envelope.
    pub fn from_raw(raw: RawAssertion) -> Result<Self, ValidationError> {
        registry::classify(raw)
    }

    /// Encode back to the exact bytes this assertion was decoded from.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self.common().raw())
    }

    pub fn common(&self) -> &Common {
        match self {
            Self::Account(a) => a.common(),
            Self::AccountKey(a) => a.common(),
            Self::EnterpriseStore(a) => a.common(),
            Self::SnapDeclaration(a) => a.common(),
            Self::SnapRevision(a) => a.common(),
            Self::SnapBuild(a) => a.common(),
        }
    }

    pub fn assertion_type(&self) -> AssertionType {
        self.common().assertion_type()
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.assertion_type().descriptor()
    }

    pub fn revision(&self) -> u64 {
        self.common().revision()
    }

    pub fn primary_key(&self) -> &[String] {
        self.common().primary_key()
    }

    pub fn authority_id(&self) -> &str {
        self.common().authority_id()
    }

    pub fn sign_key_id(&self) -> &str {
        self.common().sign_key_id()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.common().header(name)
    }

    pub fn headers(&self) -> &Headers {
        self.common().headers()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.common().body()
    }

    pub fn content(&self) -> &[u8] {
        self.common().content()
    }

    pub fn signature(&self) -> &[u8] {
        self.common().signature()
    }

    pub fn to_ref(&self) -> Ref {
        self.common().to_ref()
    }

    /// The primary key as `name "value"` pairs, for messages.
    pub fn describe(&self) -> String {
        self.common().describe()
    }

    /// Blake3 digest of the encoded assertion.
    pub fn digest(&self) -> Blake3Hash {
        Blake3Hash::hash(&self.encode())
    }

    /// The assertions that must already be known before this one is
    /// accepted, in declaration order.
    pub fn prerequisites(&self) -> Vec<Ref> {
        self.required_prerequisites()
            .into_iter()
            .map(|p| p.reference)
            .collect()
    }

    /// Prerequisites with the role each one plays.
    pub fn required_prerequisites(&self) -> Vec<Prerequisite> {
        match self {
            Self::Account(_) => Vec::new(),
            Self::AccountKey(a) => vec![Prerequisite::account(a.account_id(), "account")],
            Self::EnterpriseStore(a) => vec![Prerequisite::account(a.operator_id(), "operator")],
            Self::SnapDeclaration(a) => {
                vec![Prerequisite::account(a.publisher_id(), "publisher")]
            }
            Self::SnapRevision(a) => vec![
                Prerequisite::snap_declaration(a.snap_id()),
                Prerequisite::account(a.developer_id(), "developer"),
            ],
            Self::SnapBuild(a) => vec![Prerequisite::snap_declaration(a.snap_id())],
        }
    }

    pub fn as_account(&self) -> Option<&Account> {
        match self {
            Self::Account(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_account_key(&self) -> Option<&AccountKey> {
        match self {
            Self::AccountKey(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_enterprise_store(&self) -> Option<&EnterpriseStore> {
        match self {
            Self::EnterpriseStore(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_snap_declaration(&self) -> Option<&SnapDeclaration> {
        match self {
            Self::SnapDeclaration(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_snap_revision(&self) -> Option<&SnapRevision> {
        match self {
            Self::SnapRevision(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_snap_build(&self) -> Option<&SnapBuild> {
        match self {
            Self::SnapBuild(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AssertionBuilder;
    use crate::crypto::{sha3_384_digest, Keypair};

    const EXAMPLE: &str = "type: enterprise-store\n\
        authority-id: canonical\n\
        operator-id: op-id1\n\
        store: store1\n\
        address: https://store.example.com\n\
        sign-key-sha3-384: Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij\n\
        \n\
        AXNpZw==";

    const TS: &str = "2016-01-02T10:00:00Z";

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x11; 32])
    }

    fn account_key(owner: &Keypair) -> AssertionBuilder {
        let public_key = owner.public_key();
        AssertionBuilder::new(AssertionType::AccountKey)
            .header("account-id", "acc-1")
            .header("name", "default")
            .header("public-key-sha3-384", public_key.key_id())
            .header("since", TS)
            .body(public_key.encode_body())
    }

    #[test]
    fn test_decode_example() {
        let a = Assertion::decode(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(a.assertion_type(), AssertionType::EnterpriseStore);
        assert_eq!(a.authority_id(), "canonical");
        assert_eq!(
            a.sign_key_id(),
            "Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij"
        );
        assert_eq!(a.revision(), 0);
        assert_eq!(a.primary_key(), ["op-id1", "store1"]);

        let store = a.as_enterprise_store().unwrap();
        assert_eq!(store.operator_id(), "op-id1");
        assert_eq!(store.store(), "store1");
        assert_eq!(store.address().host_str(), Some("store.example.com"));
        assert_eq!(store.address_str(), "https://store.example.com");

        assert_eq!(a.encode(), EXAMPLE.as_bytes());
    }

    #[test]
    fn test_example_prerequisites() {
        let a = Assertion::decode(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(
            a.prerequisites(),
            vec![Ref::new(AssertionType::Account, ["op-id1"])]
        );
        let required = a.required_prerequisites();
        assert_eq!(required[0].role, "operator");
        assert_eq!(required[0].value(), "op-id1");
    }

    #[test]
    fn test_describe() {
        let a = Assertion::decode(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(a.describe(), "operator-id \"op-id1\" and store \"store1\"");
        assert_eq!(a.to_ref().to_string(), "enterprise-store/op-id1/store1");
    }

    #[test]
    fn test_enterprise_store_mandatory_headers() {
        for header in ["operator-id", "store", "address"] {
            let prefix = format!("{}: ", header);
            let text: String = EXAMPLE
                .lines()
                .filter(|l| !l.starts_with(&prefix))
                .collect::<Vec<_>>()
                .join("\n");
            let err = Assertion::decode(text.as_bytes()).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("assertion enterprise-store: {:?} header is mandatory", header)
            );

            let emptied = EXAMPLE
                .lines()
                .map(|l| {
                    if l.starts_with(&prefix) {
                        prefix.clone()
                    } else {
                        l.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            let err = Assertion::decode(emptied.as_bytes()).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("assertion enterprise-store: {:?} header should not be empty", header)
            );
        }
    }

    #[test]
    fn test_invalid_address_via_decode() {
        for (address, problem) in [
            ("ftp://store.example.com", "scheme must be \"https\" or \"http\""),
            ("https:///path", "must have a host"),
            ("https://store.example.com/?x=1", "must not have a query"),
        ] {
            let text = EXAMPLE.replace("https://store.example.com", address);
            let err = Assertion::decode(text.as_bytes()).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "assertion enterprise-store: \"address\" header {}: {}",
                    problem, address
                )
            );
        }
    }

    #[test]
    fn test_account_key_fields() {
        let owner = keypair();
        let a = account_key(&owner)
            .header("until", "2020-01-02T10:00:00Z")
            .sign(&owner, "canonical")
            .unwrap();
        let key = a.as_account_key().unwrap();
        assert_eq!(key.account_id(), "acc-1");
        assert_eq!(key.public_key(), &owner.public_key());
        assert_eq!(key.public_key_id(), owner.key_id());
        assert_eq!(a.primary_key(), [owner.key_id()]);

        let before = parse_timestamp("2015-01-01T00:00:00Z").unwrap();
        let during = parse_timestamp("2018-01-01T00:00:00Z").unwrap();
        let after = parse_timestamp("2020-01-02T10:00:00Z").unwrap();
        assert!(!key.is_valid_at(before));
        assert!(key.is_valid_at(key.since()));
        assert!(key.is_valid_at(during));
        assert!(!key.is_valid_at(after));

        assert_eq!(
            a.prerequisites(),
            vec![Ref::new(AssertionType::Account, ["acc-1"])]
        );
    }

    #[test]
    fn test_account_key_id_mismatch() {
        let signer = keypair();
        let other = Keypair::from_seed(&[0x22; 32]);
        let err = account_key(&other)
            .header("public-key-sha3-384", signer.key_id())
            .sign(&signer, "canonical")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion account-key: public key does not match provided key id"
        );
    }

    #[test]
    fn test_account_key_until_before_since() {
        let owner = keypair();
        let err = account_key(&owner)
            .header("until", "2015-01-02T10:00:00Z")
            .sign(&owner, "canonical")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion account-key: \"until\" header must be after \"since\""
        );
    }

    #[test]
    fn test_account_key_requires_body() {
        let owner = keypair();
        let err = AssertionBuilder::new(AssertionType::AccountKey)
            .header("account-id", "acc-1")
            .header("name", "default")
            .header("public-key-sha3-384", owner.key_id())
            .header("since", TS)
            .sign(&owner, "canonical")
            .unwrap_err();
        assert_eq!(err.to_string(), "assertion account-key: body is mandatory");
    }

    #[test]
    fn test_snap_revision_prerequisites() {
        let keypair = keypair();
        let a = AssertionBuilder::new(AssertionType::SnapRevision)
            .header("snap-sha3-384", sha3_384_digest(b"snap file"))
            .header("snap-id", "snap-id-1")
            .header("snap-size", "1024")
            .header("snap-revision", "3")
            .header("developer-id", "dev-1")
            .header("timestamp", TS)
            .sign(&keypair, "canonical")
            .unwrap();

        let rev = a.as_snap_revision().unwrap();
        assert_eq!(rev.snap_size(), 1024);
        assert_eq!(rev.snap_revision(), 3);

        let required = a.required_prerequisites();
        assert_eq!(
            required,
            vec![
                Prerequisite {
                    reference: Ref::new(AssertionType::SnapDeclaration, ["16", "snap-id-1"]),
                    role: "snap",
                },
                Prerequisite {
                    reference: Ref::new(AssertionType::Account, ["dev-1"]),
                    role: "developer",
                },
            ]
        );
        assert_eq!(required[0].value(), "snap-id-1");
    }

    #[test]
    fn test_snap_build_grade() {
        let keypair = keypair();
        let build = |grade: &str| {
            AssertionBuilder::new(AssertionType::SnapBuild)
                .header("snap-sha3-384", sha3_384_digest(b"snap file"))
                .header("snap-id", "snap-id-1")
                .header("snap-size", "1024")
                .header("grade", grade)
                .header("timestamp", TS)
                .sign(&keypair, "dev-1")
        };
        let a = build("devel").unwrap();
        assert_eq!(a.as_snap_build().unwrap().grade(), "devel");
        assert_eq!(
            build("beta").unwrap_err().to_string(),
            "assertion snap-build: \"grade\" header must be one of stable, devel: beta"
        );
    }

    #[test]
    fn test_account_validation_values() {
        let keypair = keypair();
        let a = AssertionBuilder::new(AssertionType::Account)
            .header("account-id", "acc-1")
            .header("display-name", "Acc One")
            .header("validation", "verified")
            .header("timestamp", TS)
            .sign(&keypair, "canonical")
            .unwrap();
        let account = a.as_account().unwrap();
        assert_eq!(account.display_name(), "Acc One");
        assert_eq!(account.username(), None);
        assert_eq!(account.validation(), "verified");
        assert!(a.prerequisites().is_empty());
        assert!(a.as_account_key().is_none());
    }

    #[test]
    fn test_digest_tracks_bytes() {
        let a = Assertion::decode(EXAMPLE.as_bytes()).unwrap();
        let b = Assertion::decode(EXAMPLE.replace("store1", "store2").as_bytes()).unwrap();
        assert_eq!(a.digest(), Blake3Hash::hash(EXAMPLE.as_bytes()));
        assert_ne!(a.digest(), b.digest());
    }
}
