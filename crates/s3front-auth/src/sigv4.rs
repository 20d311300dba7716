//! AWS Signature Version 4 verification.
//!
//! 1. Rebuild the canonical request from the classified request.
//! 2. Build the string to sign from the request timestamp, the credential
//!    scope, and the canonical request hash.
//! 3. Derive the signing key with the HMAC-SHA256 chain.
//! 4. Compare the expected signature to the provided one in constant time.
//!
//! The main entry point is [`verify`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::authorization::SIGV4_ALGORITHM;
use crate::canonical::canonical_request;
use crate::input::{SigningInput, VerifyPolicy};
use crate::{ct_eq, sigv2};

/// The service name in every credential scope this gateway accepts.
pub const SERVICE: &str = "s3";

/// Timestamp layout used in the string to sign.
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

type HmacSha256 = Hmac<Sha256>;

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use s3front_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{SIGV4_ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Credential scope `<date>/<region>/s3/aws4_request`.
#[must_use]
pub fn credential_scope(scope_date: &str, region: &str) -> String {
    format!("{scope_date}/{region}/{SERVICE}/aws4_request")
}

/// String to sign for a classified request.
#[must_use]
pub fn string_to_sign(
    input: &SigningInput,
    scope_date: &str,
    region: &str,
    signed_headers: &[String],
    policy: VerifyPolicy,
) -> String {
    let canonical = canonical_request(input, signed_headers, policy.query_ordering);
    debug!(canonical_request = %canonical, "Built canonical request");

    let timestamp = input.timestamp.format(AMZ_DATE_FORMAT).to_string();
    build_string_to_sign(
        &timestamp,
        &credential_scope(scope_date, region),
        &hash_payload(canonical.as_bytes()),
    )
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Base64 HMAC-SHA256 keyed directly by the secret, the SigV2 fallback digest.
#[must_use]
pub fn compute_base64_signature(secret_key: &str, data: &str) -> String {
    BASE64.encode(hmac_sha256(secret_key.as_bytes(), data.as_bytes()))
}

/// Check a SigV4 signature against `secret_key`.
///
/// With `policy.legacy_fallback` a base64 HMAC-SHA1 over the same string to
/// sign is also accepted. Never fails; a malformed request simply does not
/// verify.
#[must_use]
pub fn verify(
    input: &SigningInput,
    scope_date: &str,
    region: &str,
    signed_headers: &[String],
    provided: &str,
    secret_key: &str,
    policy: VerifyPolicy,
) -> bool {
    let sts = string_to_sign(input, scope_date, region, signed_headers, policy);
    debug!(string_to_sign = %sts, "Built string to sign");

    let signing_key = derive_signing_key(secret_key, scope_date, region, SERVICE);
    let expected = compute_signature(&signing_key, &sts);
    if ct_eq(provided, &expected) {
        return true;
    }

    if policy.legacy_fallback && ct_eq(provided, &sigv2::compute_signature(secret_key, &sts)) {
        debug!("SigV4 request matched the HMAC-SHA1 fallback");
        return true;
    }

    debug!(expected = %expected, provided, "Signature mismatch");
    false
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// # Examples
///
/// ```
/// use s3front_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
