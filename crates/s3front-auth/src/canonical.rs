//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every function here is pure over its arguments.

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use s3front_model::AddressingStyle;

use crate::input::{QueryOrdering, SigningInput};

/// Characters left as-is by SigV4 URI encoding: `A-Z a-z 0-9 - _ . ~`.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Payload hash literal for streaming-signature uploads.
pub const STREAMING_PAYLOAD: &str = "STREAMING-AWS4-HMAC-SHA256-PAYLOAD";

/// Payload hash literal when the client did not hash the body.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Build the full canonical request.
///
/// # Examples
///
/// ```
/// use s3front_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     "",
///     "host:examplebucket.s3.amazonaws.com\n",
///     "host",
///     "UNSIGNED-PAYLOAD",
/// );
/// assert_eq!(
///     canonical,
///     "GET\n/test.txt\n\nhost:examplebucket.s3.amazonaws.com\n\nhost\nUNSIGNED-PAYLOAD"
/// );
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    )
}

/// Canonical request for a classified request.
#[must_use]
pub fn canonical_request(
    input: &SigningInput,
    signed_headers: &[String],
    ordering: QueryOrdering,
) -> String {
    build_canonical_request(
        &input.method,
        &canonical_uri(input),
        &canonical_query_string(&input.query, ordering),
        &canonical_headers(input, signed_headers),
        &signed_headers_string(signed_headers),
        &payload_hash(input),
    )
}

/// Canonical URI.
///
/// Path style: `/` + encoded bucket + `/` + raw key. Virtual-hosted style:
/// `/` + raw key. The raw key is already encoded by the client and is not
/// encoded again.
#[must_use]
pub fn canonical_uri(input: &SigningInput) -> String {
    let raw_key = input.raw_key.as_deref();
    match (input.addressing_style, input.bucket.as_deref()) {
        (AddressingStyle::VirtualHostedStyle, _) | (_, None) => {
            format!("/{}", raw_key.unwrap_or_default())
        }
        (_, Some(bucket)) => match raw_key {
            Some(key) => format!("/{}/{key}", uri_encode(bucket)),
            None => format!("/{}", uri_encode(bucket)),
        },
    }
}

/// Canonical query string: every parameter decoded, re-encoded, and joined
/// with `&` in the requested order.
///
/// # Examples
///
/// ```
/// use s3front_auth::canonical::canonical_query_string;
/// use s3front_auth::input::QueryOrdering;
///
/// let query = vec![
///     ("prefix".to_owned(), "a b".to_owned()),
///     ("acl".to_owned(), String::new()),
/// ];
/// assert_eq!(canonical_query_string(&query, QueryOrdering::Sorted), "acl=&prefix=a%20b");
/// assert_eq!(canonical_query_string(&query, QueryOrdering::Wire), "prefix=a%20b&acl=");
/// ```
#[must_use]
pub fn canonical_query_string(query: &[(String, String)], ordering: QueryOrdering) -> String {
    let mut params: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (reencode(k), reencode(v)))
        .collect();
    if ordering == QueryOrdering::Sorted {
        params.sort_unstable();
    }
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Canonical headers: one `name:value\n` line per signed header.
///
/// Repeated headers are joined with `,`; values are trimmed and runs of
/// whitespace collapse to one space. A signed header the request lacks
/// contributes an empty value, which can only fail verification.
#[must_use]
pub fn canonical_headers(input: &SigningInput, signed_headers: &[String]) -> String {
    let mut out = String::new();
    for name in signed_headers {
        let value = input
            .header_values(name)
            .map(|v| collapse_whitespace(v.trim()))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{name}:{value}");
    }
    out
}

/// Signed header names joined by `;`.
#[must_use]
pub fn signed_headers_string(signed_headers: &[String]) -> String {
    signed_headers.join(";")
}

/// Payload hash line.
///
/// Chunked requests sign the streaming literal the client named, falling
/// back to [`STREAMING_PAYLOAD`]. Other requests sign `x-amz-content-sha256`,
/// or [`UNSIGNED_PAYLOAD`] when it is absent.
#[must_use]
pub fn payload_hash(input: &SigningInput) -> String {
    let declared = input.content_sha256.as_deref();
    if input.chunked {
        return match declared {
            Some(v) if v.starts_with("STREAMING-") => v.to_owned(),
            _ => STREAMING_PAYLOAD.to_owned(),
        };
    }
    declared.unwrap_or(UNSIGNED_PAYLOAD).to_owned()
}

/// URI-encode a value using the SigV4 rules.
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Decode then encode, so already-encoded and raw input canonicalize alike.
fn reencode(raw: &str) -> String {
    uri_encode(&percent_decode_str(raw).decode_utf8_lossy())
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
