//! The per-request value object the canonicalizer works from.

use chrono::{DateTime, Utc};
use s3front_model::AddressingStyle;
use serde::{Deserialize, Serialize};

use crate::authorization::Authorization;

/// Everything needed to canonicalize and verify one request.
///
/// Built fresh for each validation from a classified request, so concurrent
/// validations never share state.
#[derive(Debug, Clone)]
pub struct SigningInput {
    /// HTTP method, upper-case.
    pub method: String,
    /// How the bucket was addressed.
    pub addressing_style: AddressingStyle,
    /// Decoded bucket name.
    pub bucket: Option<String>,
    /// Object key exactly as it appeared on the wire (still percent-encoded).
    /// `Some("")` means the path ended with a slash after the bucket.
    pub raw_key: Option<String>,
    /// Query parameters as they appeared on the wire, undecoded, in wire order.
    pub query: Vec<(String, String)>,
    /// Request headers with lower-cased names, in wire order.
    pub headers: Vec<(String, String)>,
    /// Request time used in the SigV4 string to sign.
    pub timestamp: DateTime<Utc>,
    /// `x-amz-content-sha256` value.
    pub content_sha256: Option<String>,
    /// The body uses chunked or streaming-signature framing.
    pub chunked: bool,
    /// Parsed `Authorization` header.
    pub authorization: Authorization,
}

impl SigningInput {
    /// All values of a header, in wire order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The first value of a header, or `""`.
    #[must_use]
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or("", |(_, v)| v.as_str())
    }

    /// Whether a header is present.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Order of parameters in the SigV4 canonical query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOrdering {
    /// Sorted by encoded name, then value, as AWS specifies.
    #[default]
    Sorted,
    /// The order the parameters appeared on the wire.
    Wire,
}

/// Knobs that change how signatures are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyPolicy {
    /// Canonical query ordering for SigV4.
    pub query_ordering: QueryOrdering,
    /// Also accept the other HMAC digest (SHA-1 for SigV4, SHA-256 for SigV2)
    /// base64-encoded over the same string to sign.
    pub legacy_fallback: bool,
}
