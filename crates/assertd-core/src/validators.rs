//! Header format validators.
//!
//! Each validator is a pure function of the header name and its raw value.
//! They run only after presence and non-emptiness checks have passed, and
//! return the message (without the `assertion <type>: ` prefix) on failure.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use url::Url;

use crate::crypto::SHA3_384_LEN;

/// Signature shared by all header format validators.
pub type FormatCheck = fn(header: &str, value: &str) -> Result<(), String>;

/// Allowed values of the account `validation` header.
pub const ACCOUNT_VALIDATION_VALUES: &[&str] = &["unproven", "verified", "starred", "unknown"];

/// Allowed values of the snap-build `grade` header.
pub const BUILD_GRADE_VALUES: &[&str] = &["stable", "devel"];

/// A store address: an absolute `http`/`https` URL with a host and no
/// query or fragment.
pub fn check_address(header: &str, value: &str) -> Result<(), String> {
    let invalid = |problem: &str| format!("{:?} header {}: {}", header, problem, value);

    let parts = UriParts::split(value).ok_or_else(|| invalid("must be a valid URL"))?;

    match parts.scheme {
        Some(s) if s.eq_ignore_ascii_case("https") || s.eq_ignore_ascii_case("http") => {}
        _ => return Err(invalid("scheme must be \"https\" or \"http\"")),
    }

    if parts.host().map_or(true, str::is_empty) {
        return Err(invalid("must have a host"));
    }

    // Port, host characters and escapes.
    if Url::parse(value).is_err() {
        return Err(invalid("must be a valid URL"));
    }

    if parts.query.is_some_and(|q| !q.is_empty()) {
        return Err(invalid("must not have a query"));
    }

    if parts.fragment.is_some_and(|f| !f.is_empty()) {
        return Err(invalid("must not have a fragment"));
    }

    Ok(())
}

/// An RFC 3339 timestamp.
pub fn check_timestamp(header: &str, value: &str) -> Result<(), String> {
    parse_timestamp(value)
        .map(|_| ())
        .ok_or_else(|| format!("{:?} header is not a RFC3339 date: {}", header, value))
}

/// A non-negative decimal integer.
pub fn check_uint(header: &str, value: &str) -> Result<(), String> {
    parse_uint(value)
        .map(|_| ())
        .ok_or_else(|| format!("{:?} header is not an integer: {}", header, value))
}

/// A decimal integer no smaller than 1.
pub fn check_positive_uint(header: &str, value: &str) -> Result<(), String> {
    match parse_uint(value) {
        None => Err(format!("{:?} header is not an integer: {}", header, value)),
        Some(0) => Err(format!("{:?} header must be >= 1: {}", header, value)),
        Some(_) => Ok(()),
    }
}

/// A SHA3-384 digest in url-safe unpadded base64.
pub fn check_sha3_384(header: &str, value: &str) -> Result<(), String> {
    match URL_SAFE_NO_PAD.decode(value) {
        Ok(bytes) if bytes.len() == SHA3_384_LEN => Ok(()),
        _ => Err(format!(
            "{:?} header is not a valid SHA3-384 digest: {}",
            header, value
        )),
    }
}

/// The account `validation` level.
pub fn check_account_validation(header: &str, value: &str) -> Result<(), String> {
    check_one_of(header, value, ACCOUNT_VALIDATION_VALUES)
}

/// The snap-build `grade`.
pub fn check_build_grade(header: &str, value: &str) -> Result<(), String> {
    check_one_of(header, value, BUILD_GRADE_VALUES)
}

fn check_one_of(header: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{:?} header must be one of {}: {}",
            header,
            allowed.join(", "),
            value
        ))
    }
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse a plain decimal integer (no sign, no whitespace).
pub fn parse_uint(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// The generic components of a URI reference (RFC 3986 §3).
///
/// [`Url`] normalizes special schemes (for instance it reads `https:///x`
/// as having host `x`), which is too lenient for address headers, so the
/// reference is split here first and `Url` only checks what remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UriParts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> UriParts<'a> {
    /// Split a URI reference. Returns `None` when it cannot be parsed at all.
    fn split(value: &'a str) -> Option<Self> {
        let (scheme, rest) = split_scheme(value)?;

        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Some(q)),
            None => (rest, None),
        };

        let authority = rest.strip_prefix("//").map(|after| match after.find('/') {
            Some(i) => &after[..i],
            None => after,
        });

        if scheme.is_none() && authority.is_none() {
            // A relative path whose first segment holds a colon would be
            // mistaken for a scheme.
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return None;
            }
        }

        Some(Self {
            scheme,
            authority,
            query,
            fragment,
        })
    }

    /// The host, with user info and port removed.
    fn host(&self) -> Option<&'a str> {
        let authority = self.authority?;
        let host_port = match authority.rfind('@') {
            Some(i) => &authority[i + 1..],
            None => authority,
        };
        if let Some(bracketed) = host_port.strip_prefix('[') {
            return Some(bracketed.split(']').next().unwrap_or_default());
        }
        Some(match host_port.rfind(':') {
            Some(i) => &host_port[..i],
            None => host_port,
        })
    }
}

/// Split off `scheme:`. A leading `:` is an error; anything that does not
/// look like a scheme leaves the whole value as the rest.
fn split_scheme(value: &str) -> Option<(Option<&str>, &str)> {
    for (i, c) in value.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => return None,
            ':' => return Some((Some(&value[..i]), &value[i + 1..])),
            _ => return Some((None, value)),
        }
    }
    Some((None, value))
}
