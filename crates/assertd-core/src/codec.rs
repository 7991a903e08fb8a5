//! The text envelope of an assertion.
//!
//! An encoded assertion looks like this:
//!
//! ```text
//! type: account
//! authority-id: canonical
//! account-id: acc-1
//! body-length: 5
//! sign-key-sha3-384: Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij
//!
//! hello
//!
//! AXNpZw==
//! ```
//!
//! - The *last* blank line separates the signed content from the base64
//!   signature trailer.
//! - Inside the content, the *first* blank line separates the header block
//!   from the optional body.
//!
//! The signature covers the content bytes exactly as they were received, so
//! decoded assertions keep those bytes and re-encode to them unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::error::DecodeError;

/// The blank-line separator between envelope sections.
pub const SEPARATOR: &[u8] = b"\n\n";

/// Header carrying the body length.
pub const BODY_LENGTH_HEADER: &str = "body-length";

/// Ordered header entries.
///
/// Keys are case-sensitive and unique. Order is irrelevant for semantics but
/// kept so the document can be reported as it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a header, rejecting repeats.
    pub(crate) fn push(&mut self, name: String, value: String) -> Result<(), DecodeError> {
        if self.contains(&name) {
            return Err(DecodeError::RepeatedHeader(name));
        }
        self.0.push((name, value));
        Ok(())
    }
}

/// A decoded but not yet classified assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssertion {
    headers: Headers,
    body: Option<Bytes>,
    content: Bytes,
    signature: Bytes,
}

impl RawAssertion {
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The body, if the envelope had one.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The signed bytes: header block, plus blank line and body if present.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The decoded signature trailer.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// Decode the envelope of an assertion.
pub fn decode(data: &[u8]) -> Result<RawAssertion, DecodeError> {
    let split = rfind(data, SEPARATOR).ok_or(DecodeError::MissingSignatureSeparator)?;
    let content = &data[..split];
    let trailer = &data[split + SEPARATOR.len()..];

    let (head, body) = match find(content, SEPARATOR) {
        Some(i) => (&content[..i], Some(&content[i + SEPARATOR.len()..])),
        None => (content, None),
    };

    let head = std::str::from_utf8(head).map_err(|_| DecodeError::HeadersNotUtf8)?;
    let headers = parse_headers(head)?;

    check_body_length(&headers, body)?;

    let signature = decode_signature(trailer)?;

    Ok(RawAssertion {
        headers,
        body: body.map(Bytes::copy_from_slice),
        content: Bytes::copy_from_slice(content),
        signature: Bytes::from(signature),
    })
}

/// Encode an assertion back to its envelope.
///
/// For any value produced by [`decode`], `decode(&encode(a)) == a`.
pub fn encode(raw: &RawAssertion) -> Vec<u8> {
    assemble(&raw.content, &raw.signature)
}

/// Join signed content and a signature packet into an envelope.
pub fn assemble(content: &[u8], signature: &[u8]) -> Vec<u8> {
    let trailer = STANDARD.encode(signature);
    let mut buf = Vec::with_capacity(content.len() + SEPARATOR.len() + trailer.len());
    buf.extend_from_slice(content);
    buf.extend_from_slice(SEPARATOR);
    buf.extend_from_slice(trailer.as_bytes());
    buf
}

/// Render ordered headers and an optional body as signable content.
///
/// Callers are responsible for header order and for including
/// `body-length` when there is a body.
pub fn render_content(headers: &[(String, String)], body: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    for (i, (name, value)) in headers.iter().enumerate() {
        if i > 0 {
            buf.push(b'\n');
        }
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
    }
    if let Some(body) = body {
        buf.extend_from_slice(SEPARATOR);
        buf.extend_from_slice(body);
    }
    buf
}

/// Check that a header name has the shape `[a-z](-?[a-z0-9])*`.
pub fn is_valid_header_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    let mut prev_dash = false;
    for &b in &bytes[1..] {
        match b {
            b'a'..=b'z' | b'0'..=b'9' => prev_dash = false,
            b'-' if !prev_dash => prev_dash = true,
            _ => return false,
        }
    }
    !prev_dash
}

fn parse_headers(head: &str) -> Result<Headers, DecodeError> {
    let mut headers = Headers::new();
    if head.is_empty() {
        return Ok(headers);
    }

    for line in head.split('\n') {
        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| DecodeError::MissingColon(line.to_string()))?;

        if !is_valid_header_name(name) {
            return Err(DecodeError::InvalidHeaderName(name.to_string()));
        }

        let value = match rest.chars().next() {
            None => "",
            Some(c) if c.is_whitespace() => rest.trim(),
            Some(_) => return Err(DecodeError::MissingSpace(line.to_string())),
        };

        headers.push(name.to_string(), value.to_string())?;
    }

    Ok(headers)
}

fn check_body_length(headers: &Headers, body: Option<&[u8]>) -> Result<(), DecodeError> {
    let declared = match headers.get(BODY_LENGTH_HEADER) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| DecodeError::InvalidBodyLength(raw.to_string()))?,
        None => 0,
    };
    let actual = body.map_or(0, <[u8]>::len);
    if actual != declared {
        return Err(DecodeError::BodyLengthMismatch { actual, declared });
    }
    Ok(())
}

fn decode_signature(trailer: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let text = std::str::from_utf8(trailer)
        .map_err(|_| DecodeError::InvalidSignature("trailer is not valid UTF-8".into()))?
        .trim();
    if text.is_empty() {
        return Err(DecodeError::EmptySignature);
    }
    STANDARD
        .decode(text)
        .map_err(|e| DecodeError::InvalidSignature(e.to_string()))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
