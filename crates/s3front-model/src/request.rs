//! Request-shape enums shared by the classifier and the signature validator.

use serde::{Deserialize, Serialize};

/// How the bucket name is carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AddressingStyle {
    /// Not yet resolved.
    #[default]
    Unknown,
    /// The bucket is the first path segment.
    PathStyle,
    /// The bucket is a subdomain of a configured base domain.
    VirtualHostedStyle,
}

impl AddressingStyle {
    /// Returns the style name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::PathStyle => "PathStyle",
            Self::VirtualHostedStyle => "VirtualHostedStyle",
        }
    }
}

impl std::fmt::Display for AddressingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signing scheme named by the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignatureVersion {
    /// No `Authorization` header was sent.
    #[default]
    Unknown,
    /// Legacy `AWS <access>:<signature>`.
    V2,
    /// `AWS4-HMAC-SHA256`.
    V4,
}

impl SignatureVersion {
    /// Returns the version name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::V2 => "V2",
            Self::V4 => "V4",
        }
    }
}

impl std::fmt::Display for SignatureVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
