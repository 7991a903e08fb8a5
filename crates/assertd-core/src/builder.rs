//! Building and signing new assertions.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::assertion::Assertion;
use crate::codec::{self, is_valid_header_name, BODY_LENGTH_HEADER};
use crate::crypto::Keypair;
use crate::error::CoreError;
use crate::registry::{
    AUTHORITY_ID_HEADER, COMMON_HEADERS, REVISION_HEADER, SIGN_KEY_HEADER, TYPE_HEADER,
};
use crate::types::AssertionType;

/// Builder for creating signed assertions.
///
/// Headers are written in canonical order: `type`, `authority-id`,
/// `revision` (when above zero), the primary key headers, the remaining
/// schema headers, any extra headers sorted by name, `body-length` (when
/// there is a body) and finally `sign-key-sha3-384`.
#[derive(Debug, Clone)]
pub struct AssertionBuilder {
    assertion_type: AssertionType,
    revision: u64,
    headers: BTreeMap<String, String>,
    body: Option<Bytes>,
}

impl AssertionBuilder {
    /// Start building an assertion of the given type.
    pub fn new(assertion_type: AssertionType) -> Self {
        Self {
            assertion_type,
            revision: 0,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set a header. Setting the same header twice keeps the last value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the revision.
    pub fn revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into()).filter(|b: &Bytes| !b.is_empty());
        self
    }

    /// Render, sign and classify the assertion.
    pub fn sign(self, keypair: &Keypair, authority_id: &str) -> Result<Assertion, CoreError> {
        check_value(AUTHORITY_ID_HEADER, authority_id)?;
        for (name, value) in &self.headers {
            if COMMON_HEADERS.contains(&name.as_str()) {
                return Err(CoreError::EncodingError(format!(
                    "header {:?} is set by the builder",
                    name
                )));
            }
            if !is_valid_header_name(name) {
                return Err(CoreError::EncodingError(format!(
                    "invalid header name: {:?}",
                    name
                )));
            }
            check_value(name, value)?;
        }

        let descriptor = self.assertion_type.descriptor();
        let mut remaining = self.headers;
        let mut ordered = Vec::with_capacity(remaining.len() + 5);

        ordered.push((TYPE_HEADER.to_string(), self.assertion_type.name().to_string()));
        ordered.push((AUTHORITY_ID_HEADER.to_string(), authority_id.to_string()));
        if self.revision > 0 {
            ordered.push((REVISION_HEADER.to_string(), self.revision.to_string()));
        }

        let schema_order = descriptor
            .primary_key
            .iter()
            .copied()
            .chain(descriptor.headers.iter().map(|rule| rule.name));
        for name in schema_order {
            if let Some(value) = remaining.remove(name) {
                ordered.push((name.to_string(), value));
            }
        }
        // BTreeMap iteration is sorted by name.
        ordered.extend(remaining);

        if let Some(body) = &self.body {
            ordered.push((BODY_LENGTH_HEADER.to_string(), body.len().to_string()));
        }
        ordered.push((SIGN_KEY_HEADER.to_string(), keypair.key_id()));

        let content = codec::render_content(&ordered, self.body.as_deref());
        let signature = keypair.sign(&content);
        let encoded = codec::assemble(&content, &signature.to_packet());

        Assertion::decode(&encoded)
    }
}

fn check_value(name: &str, value: &str) -> Result<(), CoreError> {
    if value.contains('\n') {
        return Err(CoreError::EncodingError(format!(
            "header {:?} value contains a newline",
            name
        )));
    }
    Ok(())
}
