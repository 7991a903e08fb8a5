//! The static registry of assertion schemas.
//!
//! Every [`AssertionType`] maps to one [`TypeDescriptor`]. Classification
//! runs, in order:
//!
//! 1. common header checks (`type`, `authority-id`, `sign-key-sha3-384`,
//!    `revision`), reported as `assertion: ...`
//! 2. presence and non-emptiness of every declared header, in declaration
//!    order
//! 3. format validators, in declaration order; the first failure wins
//! 4. body policy
//! 5. the typed constructor for the variant
//!
//! Steps 2-5 report as `assertion <type>: ...`.

use crate::assertion::{
    Account, AccountKey, Assertion, Common, EnterpriseStore, SnapBuild, SnapDeclaration,
    SnapRevision,
};
use crate::codec::RawAssertion;
use crate::error::ValidationError;
use crate::types::AssertionType;
use crate::validators::{
    check_account_validation, check_address, check_build_grade, check_positive_uint,
    check_sha3_384, check_timestamp, check_uint, parse_uint, FormatCheck,
};

/// The `type` header.
pub const TYPE_HEADER: &str = "type";
/// The `authority-id` header.
pub const AUTHORITY_ID_HEADER: &str = "authority-id";
/// The `revision` header.
pub const REVISION_HEADER: &str = "revision";
/// The header naming the signing key.
pub const SIGN_KEY_HEADER: &str = "sign-key-sha3-384";

/// Headers every assertion carries, managed outside the per-type schema.
pub const COMMON_HEADERS: &[&str] = &[
    TYPE_HEADER,
    AUTHORITY_ID_HEADER,
    REVISION_HEADER,
    crate::codec::BODY_LENGTH_HEADER,
    SIGN_KEY_HEADER,
];

/// Whether a header must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Mandatory,
    Optional,
}

/// Whether an assertion carries a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    Forbidden,
    Required,
}

/// Which accounts may sign an assertion type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerPolicy {
    /// Only accounts in the bootstrap-trusted set, with no delegation.
    DirectlyTrusted,
    /// Any account with a valid key, subject to prerequisite checks.
    AnyAccount,
}

/// A declared header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub name: &'static str,
    pub presence: Presence,
    pub format: Option<FormatCheck>,
}

const fn mandatory(name: &'static str) -> HeaderRule {
    HeaderRule {
        name,
        presence: Presence::Mandatory,
        format: None,
    }
}

const fn mandatory_with(name: &'static str, format: FormatCheck) -> HeaderRule {
    HeaderRule {
        name,
        presence: Presence::Mandatory,
        format: Some(format),
    }
}

const fn optional(name: &'static str) -> HeaderRule {
    HeaderRule {
        name,
        presence: Presence::Optional,
        format: None,
    }
}

const fn optional_with(name: &'static str, format: FormatCheck) -> HeaderRule {
    HeaderRule {
        name,
        presence: Presence::Optional,
        format: Some(format),
    }
}

/// The schema of one assertion type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub assertion_type: AssertionType,
    /// Header names forming the primary key, in order. All are mandatory.
    pub primary_key: &'static [&'static str],
    /// Declared headers, in declaration order.
    pub headers: &'static [HeaderRule],
    pub body: BodyPolicy,
    pub signer: SignerPolicy,
}

impl TypeDescriptor {
    /// Look up a declared header rule.
    pub fn rule(&self, name: &str) -> Option<&HeaderRule> {
        self.headers.iter().find(|r| r.name == name)
    }
}

static ACCOUNT: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::Account,
    primary_key: &["account-id"],
    headers: &[
        mandatory("account-id"),
        mandatory("display-name"),
        optional("username"),
        mandatory_with("validation", check_account_validation),
        mandatory_with("timestamp", check_timestamp),
    ],
    body: BodyPolicy::Forbidden,
    signer: SignerPolicy::DirectlyTrusted,
};

static ACCOUNT_KEY: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::AccountKey,
    primary_key: &["public-key-sha3-384"],
    headers: &[
        mandatory("account-id"),
        mandatory("name"),
        mandatory_with("public-key-sha3-384", check_sha3_384),
        mandatory_with("since", check_timestamp),
        optional_with("until", check_timestamp),
    ],
    body: BodyPolicy::Required,
    signer: SignerPolicy::DirectlyTrusted,
};

static ENTERPRISE_STORE: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::EnterpriseStore,
    primary_key: &["operator-id", "store"],
    headers: &[
        mandatory("operator-id"),
        mandatory("store"),
        mandatory_with("address", check_address),
    ],
    body: BodyPolicy::Forbidden,
    signer: SignerPolicy::DirectlyTrusted,
};

static SNAP_DECLARATION: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::SnapDeclaration,
    primary_key: &["series", "snap-id"],
    headers: &[
        mandatory("series"),
        mandatory("snap-id"),
        mandatory("snap-name"),
        mandatory("publisher-id"),
        mandatory_with("timestamp", check_timestamp),
    ],
    body: BodyPolicy::Forbidden,
    signer: SignerPolicy::DirectlyTrusted,
};

static SNAP_REVISION: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::SnapRevision,
    primary_key: &["snap-sha3-384"],
    headers: &[
        mandatory_with("snap-sha3-384", check_sha3_384),
        mandatory("snap-id"),
        mandatory_with("snap-size", check_uint),
        mandatory_with("snap-revision", check_positive_uint),
        mandatory("developer-id"),
        mandatory_with("timestamp", check_timestamp),
    ],
    body: BodyPolicy::Forbidden,
    signer: SignerPolicy::DirectlyTrusted,
};

static SNAP_BUILD: TypeDescriptor = TypeDescriptor {
    assertion_type: AssertionType::SnapBuild,
    primary_key: &["snap-sha3-384"],
    headers: &[
        mandatory_with("snap-sha3-384", check_sha3_384),
        mandatory("snap-id"),
        mandatory_with("snap-size", check_uint),
        mandatory_with("grade", check_build_grade),
        mandatory_with("timestamp", check_timestamp),
    ],
    body: BodyPolicy::Forbidden,
    signer: SignerPolicy::AnyAccount,
};

/// The schema for a type.
pub fn descriptor(assertion_type: AssertionType) -> &'static TypeDescriptor {
    match assertion_type {
        AssertionType::Account => &ACCOUNT,
        AssertionType::AccountKey => &ACCOUNT_KEY,
        AssertionType::EnterpriseStore => &ENTERPRISE_STORE,
        AssertionType::SnapDeclaration => &SNAP_DECLARATION,
        AssertionType::SnapRevision => &SNAP_REVISION,
        AssertionType::SnapBuild => &SNAP_BUILD,
    }
}

/// Validate a decoded assertion against its schema and wrap it in its
/// typed variant.
pub fn classify(raw: RawAssertion) -> Result<Assertion, ValidationError> {
    let assertion_type = check_common(&raw)?;
    let revision = parse_revision(&raw)?;
    let descriptor = descriptor(assertion_type);
    let fail = |message: String| ValidationError::typed(assertion_type, message);

    for rule in descriptor.headers {
        match (raw.header(rule.name), rule.presence) {
            (None, Presence::Mandatory) => {
                return Err(fail(format!("{:?} header is mandatory", rule.name)))
            }
            (Some(""), _) => {
                return Err(fail(format!("{:?} header should not be empty", rule.name)))
            }
            _ => {}
        }
    }

    for rule in descriptor.headers {
        if let (Some(check), Some(value)) = (rule.format, raw.header(rule.name)) {
            check(rule.name, value).map_err(fail)?;
        }
    }

    match (descriptor.body, raw.body().is_some_and(|b| !b.is_empty())) {
        (BodyPolicy::Forbidden, true) => return Err(fail("unexpected body".into())),
        (BodyPolicy::Required, false) => return Err(fail("body is mandatory".into())),
        _ => {}
    }

    let primary_key = descriptor
        .primary_key
        .iter()
        .map(|name| raw.header(name).unwrap_or_default().to_string())
        .collect();

    let common = Common::new(raw, assertion_type, revision, primary_key);

    let assertion = match assertion_type {
        AssertionType::Account => Account::assemble(common).map(Assertion::Account),
        AssertionType::AccountKey => AccountKey::assemble(common).map(Assertion::AccountKey),
        AssertionType::EnterpriseStore => {
            EnterpriseStore::assemble(common).map(Assertion::EnterpriseStore)
        }
        AssertionType::SnapDeclaration => {
            SnapDeclaration::assemble(common).map(Assertion::SnapDeclaration)
        }
        AssertionType::SnapRevision => SnapRevision::assemble(common).map(Assertion::SnapRevision),
        AssertionType::SnapBuild => SnapBuild::assemble(common).map(Assertion::SnapBuild),
    };

    assertion.map_err(fail)
}

fn check_common(raw: &RawAssertion) -> Result<AssertionType, ValidationError> {
    let type_name = non_empty(raw, TYPE_HEADER)?;
    let assertion_type = AssertionType::from_name(type_name).ok_or_else(|| {
        ValidationError::common(format!("unknown assertion type: {:?}", type_name))
    })?;
    non_empty(raw, AUTHORITY_ID_HEADER)?;
    non_empty(raw, SIGN_KEY_HEADER)?;
    Ok(assertion_type)
}

fn non_empty<'a>(raw: &'a RawAssertion, name: &str) -> Result<&'a str, ValidationError> {
    match raw.header(name) {
        None => Err(ValidationError::common(format!(
            "{:?} header is mandatory",
            name
        ))),
        Some("") => Err(ValidationError::common(format!(
            "{:?} header should not be empty",
            name
        ))),
        Some(value) => Ok(value),
    }
}

fn parse_revision(raw: &RawAssertion) -> Result<u64, ValidationError> {
    let Some(value) = raw.header(REVISION_HEADER) else {
        return Ok(0);
    };
    if let Some(negative) = value.strip_prefix('-') {
        if parse_uint(negative).is_some() {
            return Err(ValidationError::common(format!(
                "{:?} header must be >= 0: {}",
                REVISION_HEADER, value
            )));
        }
    }
    parse_uint(value).ok_or_else(|| {
        ValidationError::common(format!(
            "{:?} header is not an integer: {}",
            REVISION_HEADER, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    fn raw(text: &str) -> RawAssertion {
        codec::decode(text.as_bytes()).unwrap()
    }

    const STORE: &str = "type: enterprise-store\n\
        authority-id: canonical\n\
        operator-id: op-id1\n\
        store: store1\n\
        address: https://store.example.com\n\
        sign-key-sha3-384: Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij\n\
        \n\
        AXNpZw==";

    #[test]
    fn test_primary_keys_are_mandatory() {
        for t in AssertionType::ALL {
            let d = descriptor(t);
            assert_eq!(d.assertion_type, t);
            for name in d.primary_key {
                let rule = d.rule(name).expect("primary key header must be declared");
                assert_eq!(rule.presence, Presence::Mandatory, "{} {}", t, name);
            }
            for rule in d.headers {
                assert!(!COMMON_HEADERS.contains(&rule.name));
            }
        }
    }

    #[test]
    fn test_classify_ok() {
        let a = classify(raw(STORE)).unwrap();
        assert_eq!(a.assertion_type(), AssertionType::EnterpriseStore);
        assert_eq!(a.revision(), 0);
        assert_eq!(a.primary_key(), ["op-id1", "store1"]);
    }

    #[test]
    fn test_common_header_errors() {
        let cases = [
            ("type: enterprise-store\n", "", "assertion: \"type\" header is mandatory"),
            (
                "type: enterprise-store\n",
                "type: \n",
                "assertion: \"type\" header should not be empty",
            ),
            (
                "type: enterprise-store\n",
                "type: shop\n",
                "assertion: unknown assertion type: \"shop\"",
            ),
            (
                "authority-id: canonical\n",
                "",
                "assertion: \"authority-id\" header is mandatory",
            ),
            (
                "authority-id: canonical\n",
                "authority-id: canonical\nrevision: x\n",
                "assertion: \"revision\" header is not an integer: x",
            ),
            (
                "authority-id: canonical\n",
                "authority-id: canonical\nrevision: -3\n",
                "assertion: \"revision\" header must be >= 0: -3",
            ),
        ];
        for (original, replacement, expected) in cases {
            let text = STORE.replacen(original, replacement, 1);
            let err = classify(raw(&text)).unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_missing_sign_key() {
        let text = STORE.replacen(
            "sign-key-sha3-384: Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij\n",
            "",
            1,
        );
        let err = classify(raw(&text)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion: \"sign-key-sha3-384\" header is mandatory"
        );
    }

    #[test]
    fn test_revision_parsed() {
        let text = STORE.replacen(
            "authority-id: canonical\n",
            "authority-id: canonical\nrevision: 7\n",
            1,
        );
        assert_eq!(classify(raw(&text)).unwrap().revision(), 7);
    }

    #[test]
    fn test_presence_checks_precede_format_checks() {
        // Both a bad address and a missing store: the missing header wins.
        let text = STORE
            .replacen("address: https://store.example.com\n", "address: ftp://x\n", 1)
            .replacen("store: store1\n", "", 1);
        let err = classify(raw(&text)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion enterprise-store: \"store\" header is mandatory"
        );
    }

    #[test]
    fn test_unexpected_body() {
        let text = STORE.replacen(
            "sign-key-sha3-384",
            "body-length: 4\nsign-key-sha3-384",
            1,
        );
        let text = text.replacen("\n\nAXNpZw==", "\n\nbody\n\nAXNpZw==", 1);
        let err = classify(raw(&text)).unwrap_err();
        assert_eq!(err.to_string(), "assertion enterprise-store: unexpected body");
    }
}
