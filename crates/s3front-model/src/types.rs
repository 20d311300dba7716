//! Request payload types shared with their response counterparts.
//!
//! These are plain data; their wire shape lives in `s3front-xml`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bucket or object owner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Owner {
    /// Canonical user ID.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
}

/// The party a grant applies to.
///
/// Serialized as `<Grantee xsi:type="...">` with kind-specific children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    /// A canonical AWS user.
    CanonicalUser {
        /// Canonical user ID.
        id: String,
        /// Display name.
        display_name: Option<String>,
    },
    /// A predefined group such as `AllUsers`.
    Group {
        /// Group URI.
        uri: String,
    },
    /// A user identified by e-mail address.
    AmazonCustomerByEmail {
        /// E-mail address.
        email_address: String,
    },
}

impl Grantee {
    /// Returns the `xsi:type` discriminant.
    #[must_use]
    pub fn xsi_type(&self) -> &'static str {
        match self {
            Self::CanonicalUser { .. } => "CanonicalUser",
            Self::Group { .. } => "Group",
            Self::AmazonCustomerByEmail { .. } => "AmazonCustomerByEmail",
        }
    }
}

/// ACL permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// `FULL_CONTROL`.
    #[serde(rename = "FULL_CONTROL")]
    FullControl,
    /// `WRITE`.
    #[serde(rename = "WRITE")]
    Write,
    /// `WRITE_ACP`.
    #[serde(rename = "WRITE_ACP")]
    WriteAcp,
    /// `READ`.
    #[serde(rename = "READ")]
    Read,
    /// `READ_ACP`.
    #[serde(rename = "READ_ACP")]
    ReadAcp,
}

impl Permission {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullControl => "FULL_CONTROL",
            Self::Write => "WRITE",
            Self::WriteAcp => "WRITE_ACP",
            Self::Read => "READ",
            Self::ReadAcp => "READ_ACP",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FULL_CONTROL" => Some(Self::FullControl),
            "WRITE" => Some(Self::Write),
            "WRITE_ACP" => Some(Self::WriteAcp),
            "READ" => Some(Self::Read),
            "READ_ACP" => Some(Self::ReadAcp),
            _ => None,
        }
    }
}

/// One ACL entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Who the grant applies to.
    pub grantee: Grantee,
    /// What is granted.
    pub permission: Permission,
}

/// `<AccessControlPolicy>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessControlPolicy {
    /// Resource owner.
    pub owner: Option<Owner>,
    /// Grants, in document order.
    pub grants: Vec<Grant>,
}

/// A single tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// `<Tagging>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tagging {
    /// Tags, in document order.
    pub tag_set: Vec<Tag>,
}

/// Bucket versioning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning is on.
    Enabled,
    /// Versioning was on and is now paused.
    Suspended,
}

impl VersioningStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Suspended => "Suspended",
        }
    }
}

/// MFA-delete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MfaDeleteStatus {
    /// MFA delete is required.
    Enabled,
    /// MFA delete is not required.
    Disabled,
}

impl MfaDeleteStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

/// `<VersioningConfiguration>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersioningConfiguration {
    /// Versioning state; absent on never-versioned buckets.
    pub status: Option<VersioningStatus>,
    /// MFA-delete state.
    pub mfa_delete: Option<MfaDeleteStatus>,
}

/// Object legal-hold state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalHoldStatus {
    /// Hold in place.
    #[serde(rename = "ON")]
    On,
    /// No hold.
    #[serde(rename = "OFF")]
    Off,
}

impl LegalHoldStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

/// `<LegalHold>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalHold {
    /// Hold state.
    pub status: LegalHoldStatus,
}

/// Object retention mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionMode {
    /// Privileged users may shorten or remove retention.
    #[serde(rename = "GOVERNANCE")]
    Governance,
    /// Nobody may shorten or remove retention.
    #[serde(rename = "COMPLIANCE")]
    Compliance,
}

impl RetentionMode {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Governance => "GOVERNANCE",
            Self::Compliance => "COMPLIANCE",
        }
    }
}

/// `<Retention>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Retention {
    /// Retention mode.
    pub mode: Option<RetentionMode>,
    /// End of the retention period.
    pub retain_until_date: Option<DateTime<Utc>>,
}

/// An object named in a multi-object delete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectIdentifier {
    /// Object key.
    pub key: String,
    /// Specific version to delete.
    pub version_id: Option<String>,
}

/// `<Delete>`: the multi-object delete request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteMultiple {
    /// Objects to delete.
    pub objects: Vec<ObjectIdentifier>,
    /// Report only failures.
    pub quiet: bool,
}

/// A part listed in a complete-multipart-upload request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletedPart {
    /// 1-based part number.
    pub part_number: u32,
    /// ETag returned when the part was uploaded.
    pub etag: String,
}

/// `<CompleteMultipartUpload>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompleteMultipartUpload {
    /// Parts, in document order.
    pub parts: Vec<CompletedPart>,
}

/// A structured request body, deserialized before the callback runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestPayload {
    /// The operation carries no structured body, or it was empty and a
    /// canned ACL header stood in for it.
    #[default]
    None,
    /// ACL write body.
    AccessControlPolicy(AccessControlPolicy),
    /// Tag write body.
    Tagging(Tagging),
    /// Versioning write body.
    VersioningConfiguration(VersioningConfiguration),
    /// Legal-hold write body.
    LegalHold(LegalHold),
    /// Retention write body.
    Retention(Retention),
    /// Multi-object delete body.
    DeleteMultiple(DeleteMultiple),
    /// Complete-multipart-upload body.
    CompleteMultipartUpload(CompleteMultipartUpload),
}
