//! Response documents with a fixed wire shape.

use chrono::{DateTime, Utc};

use crate::types::Owner;

/// A bucket in a service listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub creation_date: DateTime<Utc>,
}

/// `<ListAllMyBucketsResult>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListAllMyBucketsResult {
    /// Account owner.
    pub owner: Option<Owner>,
    /// Buckets.
    pub buckets: Vec<Bucket>,
}

/// An object in a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Object key.
    pub key: String,
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
    /// Entity tag, including quotes.
    pub etag: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage class, `STANDARD` unless set otherwise.
    pub storage_class: String,
    /// Object owner.
    pub owner: Option<Owner>,
}

/// `<ListBucketResult>` (list objects, version 1 and 2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListBucketResult {
    /// Bucket name.
    pub name: String,
    /// Prefix the listing was limited to.
    pub prefix: Option<String>,
    /// Marker the listing started after.
    pub marker: Option<String>,
    /// Continuation token (list-type 2).
    pub continuation_token: Option<String>,
    /// Grouping delimiter.
    pub delimiter: Option<String>,
    /// Page size.
    pub max_keys: u32,
    /// More results are available.
    pub is_truncated: bool,
    /// Marker for the next page.
    pub next_marker: Option<String>,
    /// Continuation token for the next page (list-type 2).
    pub next_continuation_token: Option<String>,
    /// Objects.
    pub contents: Vec<Object>,
    /// Rolled-up prefixes.
    pub common_prefixes: Vec<String>,
}

/// `<LocationConstraint>`; empty for the default region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationConstraint {
    /// Region name.
    pub region: Option<String>,
}

/// An object removed by a multi-object delete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeletedObject {
    /// Object key.
    pub key: String,
    /// Deleted version.
    pub version_id: Option<String>,
}

/// An object a multi-object delete could not remove.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteError {
    /// Object key.
    pub key: String,
    /// Version that failed.
    pub version_id: Option<String>,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// `<DeleteResult>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteResult {
    /// Removed objects.
    pub deleted: Vec<DeletedObject>,
    /// Failures.
    pub errors: Vec<DeleteError>,
}

/// `<InitiateMultipartUploadResult>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitiateMultipartUploadResult {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Upload ID.
    pub upload_id: String,
}

/// `<CompleteMultipartUploadResult>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompleteMultipartUploadResult {
    /// Object URL.
    pub location: String,
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Entity tag of the assembled object.
    pub etag: String,
}
