//! Error types for request authentication.

/// Errors that can occur while parsing or checking a request signature.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carries no `Authorization` header.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format: {0}")]
    InvalidAuthHeader(String),

    /// The first token of the `Authorization` header names no known scheme.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The `Credential` component does not match
    /// `AKID/date/region/service/aws4_request`.
    #[error("Invalid credential format")]
    InvalidCredential,

    /// The access key ID was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
