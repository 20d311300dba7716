//! Operation kinds resolved by the request classifier.

use serde::{Deserialize, Serialize};

/// The logical S3 operation a request resolves to.
///
/// The classifier maps every request to exactly one kind; requests that do
/// not match any rule resolve to [`OperationKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationKind {
    /// The ListBuckets operation.
    ListBuckets,
    /// The ServiceExists operation.
    ServiceExists,
    /// The BucketRead operation.
    BucketRead,
    /// The BucketReadAcl operation.
    BucketReadAcl,
    /// The BucketReadLocation operation.
    BucketReadLocation,
    /// The BucketReadLogging operation.
    BucketReadLogging,
    /// The BucketReadTags operation.
    BucketReadTags,
    /// The BucketReadVersions operation.
    BucketReadVersions,
    /// The BucketReadVersioning operation.
    BucketReadVersioning,
    /// The BucketReadWebsite operation.
    BucketReadWebsite,
    /// The BucketReadMultipartUploads operation.
    BucketReadMultipartUploads,
    /// The BucketExists operation.
    BucketExists,
    /// The BucketWrite operation.
    BucketWrite,
    /// The BucketWriteAcl operation.
    BucketWriteAcl,
    /// The BucketWriteLogging operation.
    BucketWriteLogging,
    /// The BucketWriteTags operation.
    BucketWriteTags,
    /// The BucketWriteVersioning operation.
    BucketWriteVersioning,
    /// The BucketWriteWebsite operation.
    BucketWriteWebsite,
    /// The BucketDelete operation.
    BucketDelete,
    /// The BucketDeleteAcl operation.
    BucketDeleteAcl,
    /// The BucketDeleteTags operation.
    BucketDeleteTags,
    /// The BucketDeleteWebsite operation.
    BucketDeleteWebsite,
    /// The ObjectRead operation.
    ObjectRead,
    /// The ObjectReadRange operation.
    ObjectReadRange,
    /// The ObjectReadAcl operation.
    ObjectReadAcl,
    /// The ObjectReadLegalHold operation.
    ObjectReadLegalHold,
    /// The ObjectReadRetention operation.
    ObjectReadRetention,
    /// The ObjectReadTags operation.
    ObjectReadTags,
    /// The ObjectReadParts operation.
    ObjectReadParts,
    /// The ObjectExists operation.
    ObjectExists,
    /// The ObjectWrite operation.
    ObjectWrite,
    /// The ObjectWriteAcl operation.
    ObjectWriteAcl,
    /// The ObjectWriteLegalHold operation.
    ObjectWriteLegalHold,
    /// The ObjectWriteRetention operation.
    ObjectWriteRetention,
    /// The ObjectWriteTags operation.
    ObjectWriteTags,
    /// The ObjectUploadPart operation.
    ObjectUploadPart,
    /// The ObjectCreateMultipartUpload operation.
    ObjectCreateMultipartUpload,
    /// The ObjectCompleteMultipartUpload operation.
    ObjectCompleteMultipartUpload,
    /// The ObjectDelete operation.
    ObjectDelete,
    /// The ObjectDeleteAcl operation.
    ObjectDeleteAcl,
    /// The ObjectDeleteTags operation.
    ObjectDeleteTags,
    /// The ObjectAbortMultipartUpload operation.
    ObjectAbortMultipartUpload,
    /// The ObjectDeleteMultiple operation.
    ObjectDeleteMultiple,
    /// The request did not match any rule.
    #[default]
    Unknown,
}

impl OperationKind {
    /// Every operation kind, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::ListBuckets,
        Self::ServiceExists,
        Self::BucketRead,
        Self::BucketReadAcl,
        Self::BucketReadLocation,
        Self::BucketReadLogging,
        Self::BucketReadTags,
        Self::BucketReadVersions,
        Self::BucketReadVersioning,
        Self::BucketReadWebsite,
        Self::BucketReadMultipartUploads,
        Self::BucketExists,
        Self::BucketWrite,
        Self::BucketWriteAcl,
        Self::BucketWriteLogging,
        Self::BucketWriteTags,
        Self::BucketWriteVersioning,
        Self::BucketWriteWebsite,
        Self::BucketDelete,
        Self::BucketDeleteAcl,
        Self::BucketDeleteTags,
        Self::BucketDeleteWebsite,
        Self::ObjectRead,
        Self::ObjectReadRange,
        Self::ObjectReadAcl,
        Self::ObjectReadLegalHold,
        Self::ObjectReadRetention,
        Self::ObjectReadTags,
        Self::ObjectReadParts,
        Self::ObjectExists,
        Self::ObjectWrite,
        Self::ObjectWriteAcl,
        Self::ObjectWriteLegalHold,
        Self::ObjectWriteRetention,
        Self::ObjectWriteTags,
        Self::ObjectUploadPart,
        Self::ObjectCreateMultipartUpload,
        Self::ObjectCompleteMultipartUpload,
        Self::ObjectDelete,
        Self::ObjectDeleteAcl,
        Self::ObjectDeleteTags,
        Self::ObjectAbortMultipartUpload,
        Self::ObjectDeleteMultiple,
        Self::Unknown,
    ];

    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListBuckets => "ListBuckets",
            Self::ServiceExists => "ServiceExists",
            Self::BucketRead => "BucketRead",
            Self::BucketReadAcl => "BucketReadAcl",
            Self::BucketReadLocation => "BucketReadLocation",
            Self::BucketReadLogging => "BucketReadLogging",
            Self::BucketReadTags => "BucketReadTags",
            Self::BucketReadVersions => "BucketReadVersions",
            Self::BucketReadVersioning => "BucketReadVersioning",
            Self::BucketReadWebsite => "BucketReadWebsite",
            Self::BucketReadMultipartUploads => "BucketReadMultipartUploads",
            Self::BucketExists => "BucketExists",
            Self::BucketWrite => "BucketWrite",
            Self::BucketWriteAcl => "BucketWriteAcl",
            Self::BucketWriteLogging => "BucketWriteLogging",
            Self::BucketWriteTags => "BucketWriteTags",
            Self::BucketWriteVersioning => "BucketWriteVersioning",
            Self::BucketWriteWebsite => "BucketWriteWebsite",
            Self::BucketDelete => "BucketDelete",
            Self::BucketDeleteAcl => "BucketDeleteAcl",
            Self::BucketDeleteTags => "BucketDeleteTags",
            Self::BucketDeleteWebsite => "BucketDeleteWebsite",
            Self::ObjectRead => "ObjectRead",
            Self::ObjectReadRange => "ObjectReadRange",
            Self::ObjectReadAcl => "ObjectReadAcl",
            Self::ObjectReadLegalHold => "ObjectReadLegalHold",
            Self::ObjectReadRetention => "ObjectReadRetention",
            Self::ObjectReadTags => "ObjectReadTags",
            Self::ObjectReadParts => "ObjectReadParts",
            Self::ObjectExists => "ObjectExists",
            Self::ObjectWrite => "ObjectWrite",
            Self::ObjectWriteAcl => "ObjectWriteAcl",
            Self::ObjectWriteLegalHold => "ObjectWriteLegalHold",
            Self::ObjectWriteRetention => "ObjectWriteRetention",
            Self::ObjectWriteTags => "ObjectWriteTags",
            Self::ObjectUploadPart => "ObjectUploadPart",
            Self::ObjectCreateMultipartUpload => "ObjectCreateMultipartUpload",
            Self::ObjectCompleteMultipartUpload => "ObjectCompleteMultipartUpload",
            Self::ObjectDelete => "ObjectDelete",
            Self::ObjectDeleteAcl => "ObjectDeleteAcl",
            Self::ObjectDeleteTags => "ObjectDeleteTags",
            Self::ObjectAbortMultipartUpload => "ObjectAbortMultipartUpload",
            Self::ObjectDeleteMultiple => "ObjectDeleteMultiple",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns the permission a caller needs to perform this operation.
    #[must_use]
    pub fn required_permission(&self) -> RequiredPermission {
        match self {
            Self::ListBuckets
            | Self::ServiceExists
            | Self::Unknown => RequiredPermission::None,
            Self::BucketRead
            | Self::BucketReadLocation
            | Self::BucketReadLogging
            | Self::BucketReadTags
            | Self::BucketReadVersions
            | Self::BucketReadVersioning
            | Self::BucketReadWebsite
            | Self::BucketReadMultipartUploads
            | Self::BucketExists => RequiredPermission::BucketRead,
            Self::BucketReadAcl => RequiredPermission::BucketReadAcp,
            Self::BucketWrite
            | Self::BucketWriteLogging
            | Self::BucketWriteTags
            | Self::BucketWriteVersioning
            | Self::BucketWriteWebsite
            | Self::BucketDelete
            | Self::BucketDeleteTags
            | Self::BucketDeleteWebsite => RequiredPermission::BucketWrite,
            Self::BucketWriteAcl | Self::BucketDeleteAcl => RequiredPermission::BucketWriteAcp,
            Self::ObjectRead
            | Self::ObjectReadRange
            | Self::ObjectReadLegalHold
            | Self::ObjectReadRetention
            | Self::ObjectReadTags
            | Self::ObjectReadParts
            | Self::ObjectExists => RequiredPermission::ObjectRead,
            Self::ObjectReadAcl => RequiredPermission::ObjectReadAcp,
            Self::ObjectWrite
            | Self::ObjectWriteLegalHold
            | Self::ObjectWriteRetention
            | Self::ObjectWriteTags
            | Self::ObjectUploadPart
            | Self::ObjectCreateMultipartUpload
            | Self::ObjectCompleteMultipartUpload
            | Self::ObjectDelete
            | Self::ObjectDeleteTags
            | Self::ObjectAbortMultipartUpload
            | Self::ObjectDeleteMultiple => RequiredPermission::ObjectWrite,
            Self::ObjectWriteAcl | Self::ObjectDeleteAcl => RequiredPermission::ObjectWriteAcp,
        }
    }

    /// Returns the structured request payload this operation expects, if any.
    #[must_use]
    pub fn payload_kind(&self) -> Option<PayloadKind> {
        match self {
            Self::BucketWriteAcl | Self::ObjectWriteAcl => Some(PayloadKind::AccessControlPolicy),
            Self::BucketWriteTags | Self::ObjectWriteTags => Some(PayloadKind::Tagging),
            Self::BucketWriteVersioning => Some(PayloadKind::VersioningConfiguration),
            Self::ObjectWriteLegalHold => Some(PayloadKind::LegalHold),
            Self::ObjectWriteRetention => Some(PayloadKind::Retention),
            Self::ObjectCompleteMultipartUpload => Some(PayloadKind::CompleteMultipartUpload),
            Self::ObjectDeleteMultiple => Some(PayloadKind::DeleteMultiple),
            _ => None,
        }
    }

    /// Returns the status sent when the callback succeeds.
    ///
    /// Deletes answer `204 No Content`; multi-object delete returns a result
    /// document and answers `200 OK` like every other operation.
    #[must_use]
    pub fn success_status(&self) -> http::StatusCode {
        match self {
            Self::BucketDelete
            | Self::BucketDeleteAcl
            | Self::BucketDeleteTags
            | Self::BucketDeleteWebsite
            | Self::ObjectDelete
            | Self::ObjectDeleteAcl
            | Self::ObjectDeleteTags
            | Self::ObjectAbortMultipartUpload => http::StatusCode::NO_CONTENT,
            _ => http::StatusCode::OK,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission a caller must hold for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredPermission {
    /// No bucket or object permission applies.
    None,
    /// Read bucket contents.
    BucketRead,
    /// Read the bucket ACL.
    BucketReadAcp,
    /// Modify the bucket or its configuration.
    BucketWrite,
    /// Modify the bucket ACL.
    BucketWriteAcp,
    /// Read object data or metadata.
    ObjectRead,
    /// Read the object ACL.
    ObjectReadAcp,
    /// Create, modify, or delete objects.
    ObjectWrite,
    /// Modify the object ACL.
    ObjectWriteAcp,
}

/// Structured XML payload carried by a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    /// `<AccessControlPolicy>`.
    AccessControlPolicy,
    /// `<Tagging>`.
    Tagging,
    /// `<VersioningConfiguration>`.
    VersioningConfiguration,
    /// `<LegalHold>`.
    LegalHold,
    /// `<Retention>`.
    Retention,
    /// `<Delete>`.
    DeleteMultiple,
    /// `<CompleteMultipartUpload>`.
    CompleteMultipartUpload,
}
