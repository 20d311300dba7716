//! The classified, immutable view of one inbound S3 request.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use s3front_auth::{Authorization, SigningInput};
use s3front_model::{AddressingStyle, OperationKind, RequiredPermission, SignatureVersion};

/// A sub-resource marker carried in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResource {
    /// `?acl`
    Acl,
    /// `?location`
    Location,
    /// `?logging`
    Logging,
    /// `?tagging`
    Tagging,
    /// `?versions`
    Versions,
    /// `?versioning`
    Versioning,
    /// `?website`
    Website,
    /// `?legal-hold`
    LegalHold,
    /// `?retention`
    Retention,
    /// `?delete`
    Delete,
    /// `?uploads`
    Uploads,
    /// `?uploadId=...`
    UploadId,
}

impl SubResource {
    /// Match a query key, case-insensitively.
    #[must_use]
    pub fn from_query_key(key: &str) -> Option<Self> {
        const TABLE: &[(&str, SubResource)] = &[
            ("acl", SubResource::Acl),
            ("location", SubResource::Location),
            ("logging", SubResource::Logging),
            ("tagging", SubResource::Tagging),
            ("versions", SubResource::Versions),
            ("versioning", SubResource::Versioning),
            ("website", SubResource::Website),
            ("legal-hold", SubResource::LegalHold),
            ("retention", SubResource::Retention),
            ("delete", SubResource::Delete),
            ("uploads", SubResource::Uploads),
            ("uploadid", SubResource::UploadId),
        ];
        TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, sub)| *sub)
    }
}

/// A parsed `Range: bytes=start-end` header. An empty bound reads as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset, inclusive; `0` when the header left it open.
    pub end: u64,
}

/// A fully classified S3 request.
///
/// Built once per inbound call by
/// [`RequestClassifier`](crate::classify::RequestClassifier) and never
/// mutated afterwards; the dispatcher shares it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ClassifiedRequest {
    pub(crate) request_id: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) addressing_style: AddressingStyle,
    pub(crate) operation: OperationKind,
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) raw_key: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) marker: Option<String>,
    pub(crate) continuation_token: Option<String>,
    pub(crate) max_keys: u32,
    pub(crate) version_id: Option<String>,
    pub(crate) upload_id: Option<String>,
    pub(crate) part_number: Option<u32>,
    pub(crate) sub_resources: Vec<SubResource>,
    pub(crate) region: String,
    pub(crate) host: Option<String>,
    pub(crate) hostname: Option<String>,
    pub(crate) base_domain: Option<String>,
    pub(crate) authorization: Option<Authorization>,
    pub(crate) authorization_raw: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) content_md5: Option<String>,
    pub(crate) content_sha256: Option<String>,
    pub(crate) content_length: Option<u64>,
    pub(crate) chunked: bool,
    pub(crate) range: Option<ByteRange>,
    pub(crate) headers: HeaderMap,
    pub(crate) query: Vec<(String, String)>,
}

impl ClassifiedRequest {
    /// Opaque per-request identifier, echoed in `x-amz-request-id`.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Capture time, or the parsed `x-amz-date`/`Date` header.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI as received.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// How the bucket was addressed.
    #[must_use]
    pub fn addressing_style(&self) -> AddressingStyle {
        self.addressing_style
    }

    /// The resolved operation.
    #[must_use]
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Permission a host must check before serving the operation.
    #[must_use]
    pub fn required_permission(&self) -> RequiredPermission {
        self.operation.required_permission()
    }

    /// Decoded bucket name.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Decoded object key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// `prefix` query parameter.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// `delimiter` query parameter.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// `marker` query parameter (ListObjects v1).
    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// `continuation-token` query parameter (ListObjects v2).
    #[must_use]
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// `max-keys`; `0` when absent or invalid.
    #[must_use]
    pub fn max_keys(&self) -> u32 {
        self.max_keys
    }

    /// `versionId` query parameter.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// `uploadId` query parameter.
    #[must_use]
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// `partNumber` query parameter.
    #[must_use]
    pub fn part_number(&self) -> Option<u32> {
        self.part_number
    }

    /// Distinct sub-resource markers, in query order.
    #[must_use]
    pub fn sub_resources(&self) -> &[SubResource] {
        &self.sub_resources
    }

    /// Whether a sub-resource marker is present.
    #[must_use]
    pub fn has_sub_resource(&self, sub: SubResource) -> bool {
        self.sub_resources.contains(&sub)
    }

    /// Region from the SigV4 credential scope, else the configured region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// `Host` header value as sent.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Host name without port, lower-cased.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// The base domain matched for virtual-hosted requests.
    #[must_use]
    pub fn base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }

    /// Signing scheme, `Unknown` for anonymous requests.
    #[must_use]
    pub fn signature_version(&self) -> SignatureVersion {
        self.authorization
            .as_ref()
            .map_or(SignatureVersion::Unknown, Authorization::version)
    }

    /// Parsed `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    /// Access key ID from the `Authorization` header.
    #[must_use]
    pub fn access_key(&self) -> Option<&str> {
        self.authorization.as_ref().map(Authorization::access_key)
    }

    /// Client-supplied signature.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.authorization.as_ref().map(Authorization::signature)
    }

    /// Signed header names (SigV4), lower-cased and sorted.
    #[must_use]
    pub fn signed_headers(&self) -> &[String] {
        match &self.authorization {
            Some(authorization) => authorization.signed_headers(),
            None => &[],
        }
    }

    /// The `Authorization` header exactly as sent.
    #[must_use]
    pub fn authorization_raw(&self) -> Option<&str> {
        self.authorization_raw.as_deref()
    }

    /// `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// `Content-MD5` header.
    #[must_use]
    pub fn content_md5(&self) -> Option<&str> {
        self.content_md5.as_deref()
    }

    /// `x-amz-content-sha256` header.
    #[must_use]
    pub fn content_sha256(&self) -> Option<&str> {
        self.content_sha256.as_deref()
    }

    /// Declared `Content-Length`.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// The request body uses chunked or streaming-signature framing, and the
    /// response must be sent chunked.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    /// The body uses the AWS streaming-signature envelope.
    #[must_use]
    pub fn is_aws_chunked(&self) -> bool {
        self.content_sha256
            .as_deref()
            .is_some_and(|v| v.to_ascii_lowercase().contains("streaming"))
            || self
                .header(http::header::CONTENT_ENCODING.as_str())
                .is_some_and(|v| v.contains("aws-chunked"))
    }

    /// Parsed `Range` header.
    #[must_use]
    pub fn range(&self) -> Option<ByteRange> {
        self.range
    }

    /// Start of the requested range.
    #[must_use]
    pub fn range_start(&self) -> Option<u64> {
        self.range.map(|r| r.start)
    }

    /// End of the requested range.
    #[must_use]
    pub fn range_end(&self) -> Option<u64> {
        self.range.map(|r| r.end)
    }

    /// All request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, case-insensitive. Non-UTF-8 values read as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded value of a query parameter, case-insensitive. Valueless
    /// parameters read as `""`.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.query
            .iter()
            .find(|(k, _)| decode(k).eq_ignore_ascii_case(name))
            .map(|(_, v)| decode(v))
    }

    /// Raw query pairs in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// The canonicalization input for signature checks, or `None` for an
    /// anonymous request.
    #[must_use]
    pub fn signing_input(&self) -> Option<SigningInput> {
        let authorization = self.authorization.clone()?;
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Some(SigningInput {
            method: self.method.as_str().to_owned(),
            addressing_style: self.addressing_style,
            bucket: self.bucket.clone(),
            raw_key: self.raw_key.clone(),
            query: self.query.clone(),
            headers,
            timestamp: self.timestamp,
            content_sha256: self.content_sha256.clone(),
            chunked: self.chunked,
            authorization,
        })
    }

    /// Resource path used in error documents: `/bucket/key`.
    #[must_use]
    pub fn resource(&self) -> String {
        match (self.bucket.as_deref(), self.key.as_deref()) {
            (Some(bucket), Some(key)) => format!("/{bucket}/{key}"),
            (Some(bucket), None) => format!("/{bucket}"),
            _ => "/".to_owned(),
        }
    }
}

pub(crate) fn decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8_lossy()
}
