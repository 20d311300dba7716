//! The closed S3 error-code table and the [`S3Error`] domain error.
//!
//! Each [`S3ErrorCode`] maps to a fixed message and a fixed HTTP status. An
//! [`S3Error`] only carries the code plus optional context, so neither the
//! message nor the status can drift from the table.

use std::fmt;

/// Well-known S3 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3ErrorCode {
    /// AccessDenied error.
    AccessDenied,
    /// AccountProblem error.
    AccountProblem,
    /// AmbiguousGrantByEmailAddress error.
    AmbiguousGrantByEmailAddress,
    /// AuthorizationHeaderMalformed error.
    AuthorizationHeaderMalformed,
    /// BadDigest error.
    BadDigest,
    /// BucketAlreadyExists error.
    BucketAlreadyExists,
    /// BucketAlreadyOwnedByYou error.
    BucketAlreadyOwnedByYou,
    /// BucketNotEmpty error.
    BucketNotEmpty,
    /// CredentialsNotSupported error.
    CredentialsNotSupported,
    /// CrossLocationLoggingProhibited error.
    CrossLocationLoggingProhibited,
    /// EntityTooSmall error.
    EntityTooSmall,
    /// EntityTooLarge error.
    EntityTooLarge,
    /// ExpiredToken error.
    ExpiredToken,
    /// IllegalVersioningConfigurationException error.
    IllegalVersioningConfigurationException,
    /// IncompleteBody error.
    IncompleteBody,
    /// IncorrectNumberOfFilesInPostRequest error.
    IncorrectNumberOfFilesInPostRequest,
    /// InlineDataTooLarge error.
    InlineDataTooLarge,
    /// InternalError error.
    InternalError,
    /// InvalidAccessKeyId error.
    InvalidAccessKeyId,
    /// InvalidAddressingHeader error.
    InvalidAddressingHeader,
    /// InvalidArgument error.
    InvalidArgument,
    /// InvalidBucketName error.
    InvalidBucketName,
    /// InvalidBucketState error.
    InvalidBucketState,
    /// InvalidDigest error.
    InvalidDigest,
    /// InvalidEncryptionAlgorithmError error.
    InvalidEncryptionAlgorithmError,
    /// InvalidLocationConstraint error.
    InvalidLocationConstraint,
    /// InvalidObjectState error.
    InvalidObjectState,
    /// InvalidPart error.
    InvalidPart,
    /// InvalidPartOrder error.
    InvalidPartOrder,
    /// InvalidPayer error.
    InvalidPayer,
    /// InvalidPolicyDocument error.
    InvalidPolicyDocument,
    /// InvalidRange error.
    InvalidRange,
    /// InvalidRequest error.
    InvalidRequest,
    /// InvalidSecurity error.
    InvalidSecurity,
    /// InvalidSOAPRequest error.
    InvalidSOAPRequest,
    /// InvalidStorageClass error.
    InvalidStorageClass,
    /// InvalidTargetBucketForLogging error.
    InvalidTargetBucketForLogging,
    /// InvalidToken error.
    InvalidToken,
    /// InvalidURI error.
    InvalidURI,
    /// KeyTooLongError error.
    KeyTooLongError,
    /// MalformedACLError error.
    MalformedACLError,
    /// MalformedPOSTRequest error.
    MalformedPOSTRequest,
    /// MalformedXML error.
    MalformedXML,
    /// MaxMessageLengthExceeded error.
    MaxMessageLengthExceeded,
    /// MaxPostPreDataLengthExceededError error.
    MaxPostPreDataLengthExceededError,
    /// MetadataTooLarge error.
    MetadataTooLarge,
    /// MethodNotAllowed error.
    MethodNotAllowed,
    /// MissingAttachment error.
    MissingAttachment,
    /// MissingContentLength error.
    MissingContentLength,
    /// MissingRequestBodyError error.
    MissingRequestBodyError,
    /// MissingSecurityElement error.
    MissingSecurityElement,
    /// MissingSecurityHeader error.
    MissingSecurityHeader,
    /// NoLoggingStatusForKey error.
    NoLoggingStatusForKey,
    /// NoSuchBucket error.
    NoSuchBucket,
    /// NoSuchBucketPolicy error.
    NoSuchBucketPolicy,
    /// NoSuchKey error.
    NoSuchKey,
    /// NoSuchLifecycleConfiguration error.
    NoSuchLifecycleConfiguration,
    /// NoSuchObjectLockConfiguration error.
    NoSuchObjectLockConfiguration,
    /// NoSuchTagSet error.
    NoSuchTagSet,
    /// NoSuchUpload error.
    NoSuchUpload,
    /// NoSuchVersion error.
    NoSuchVersion,
    /// NoSuchWebsiteConfiguration error.
    NoSuchWebsiteConfiguration,
    /// NotImplemented error.
    NotImplemented,
    /// NotSignedUp error.
    NotSignedUp,
    /// OperationAborted error.
    OperationAborted,
    /// PermanentRedirect error.
    PermanentRedirect,
    /// PreconditionFailed error.
    PreconditionFailed,
    /// Redirect error.
    Redirect,
    /// RequestIsNotMultiPartContent error.
    RequestIsNotMultiPartContent,
    /// RequestTimeout error.
    RequestTimeout,
    /// RequestTimeTooSkewed error.
    RequestTimeTooSkewed,
    /// RequestTorrentOfBucketError error.
    RequestTorrentOfBucketError,
    /// RestoreAlreadyInProgress error.
    RestoreAlreadyInProgress,
    /// ServiceUnavailable error.
    ServiceUnavailable,
    /// SignatureDoesNotMatch error.
    SignatureDoesNotMatch,
    /// SlowDown error.
    SlowDown,
    /// TemporaryRedirect error.
    TemporaryRedirect,
    /// TokenRefreshRequired error.
    TokenRefreshRequired,
    /// TooManyBuckets error.
    TooManyBuckets,
    /// UnexpectedContent error.
    UnexpectedContent,
    /// UnresolvableGrantByEmailAddress error.
    UnresolvableGrantByEmailAddress,
    /// UserKeyMustBeSpecified error.
    UserKeyMustBeSpecified,
}

impl S3ErrorCode {
    /// Every error code, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::AccessDenied,
        Self::AccountProblem,
        Self::AmbiguousGrantByEmailAddress,
        Self::AuthorizationHeaderMalformed,
        Self::BadDigest,
        Self::BucketAlreadyExists,
        Self::BucketAlreadyOwnedByYou,
        Self::BucketNotEmpty,
        Self::CredentialsNotSupported,
        Self::CrossLocationLoggingProhibited,
        Self::EntityTooSmall,
        Self::EntityTooLarge,
        Self::ExpiredToken,
        Self::IllegalVersioningConfigurationException,
        Self::IncompleteBody,
        Self::IncorrectNumberOfFilesInPostRequest,
        Self::InlineDataTooLarge,
        Self::InternalError,
        Self::InvalidAccessKeyId,
        Self::InvalidAddressingHeader,
        Self::InvalidArgument,
        Self::InvalidBucketName,
        Self::InvalidBucketState,
        Self::InvalidDigest,
        Self::InvalidEncryptionAlgorithmError,
        Self::InvalidLocationConstraint,
        Self::InvalidObjectState,
        Self::InvalidPart,
        Self::InvalidPartOrder,
        Self::InvalidPayer,
        Self::InvalidPolicyDocument,
        Self::InvalidRange,
        Self::InvalidRequest,
        Self::InvalidSecurity,
        Self::InvalidSOAPRequest,
        Self::InvalidStorageClass,
        Self::InvalidTargetBucketForLogging,
        Self::InvalidToken,
        Self::InvalidURI,
        Self::KeyTooLongError,
        Self::MalformedACLError,
        Self::MalformedPOSTRequest,
        Self::MalformedXML,
        Self::MaxMessageLengthExceeded,
        Self::MaxPostPreDataLengthExceededError,
        Self::MetadataTooLarge,
        Self::MethodNotAllowed,
        Self::MissingAttachment,
        Self::MissingContentLength,
        Self::MissingRequestBodyError,
        Self::MissingSecurityElement,
        Self::MissingSecurityHeader,
        Self::NoLoggingStatusForKey,
        Self::NoSuchBucket,
        Self::NoSuchBucketPolicy,
        Self::NoSuchKey,
        Self::NoSuchLifecycleConfiguration,
        Self::NoSuchObjectLockConfiguration,
        Self::NoSuchTagSet,
        Self::NoSuchUpload,
        Self::NoSuchVersion,
        Self::NoSuchWebsiteConfiguration,
        Self::NotImplemented,
        Self::NotSignedUp,
        Self::OperationAborted,
        Self::PermanentRedirect,
        Self::PreconditionFailed,
        Self::Redirect,
        Self::RequestIsNotMultiPartContent,
        Self::RequestTimeout,
        Self::RequestTimeTooSkewed,
        Self::RequestTorrentOfBucketError,
        Self::RestoreAlreadyInProgress,
        Self::ServiceUnavailable,
        Self::SignatureDoesNotMatch,
        Self::SlowDown,
        Self::TemporaryRedirect,
        Self::TokenRefreshRequired,
        Self::TooManyBuckets,
        Self::UnexpectedContent,
        Self::UnresolvableGrantByEmailAddress,
        Self::UserKeyMustBeSpecified,
    ];

    /// Returns the error code as it appears in the `<Code>` element.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::AccountProblem => "AccountProblem",
            Self::AmbiguousGrantByEmailAddress => "AmbiguousGrantByEmailAddress",
            Self::AuthorizationHeaderMalformed => "AuthorizationHeaderMalformed",
            Self::BadDigest => "BadDigest",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
            Self::BucketNotEmpty => "BucketNotEmpty",
            Self::CredentialsNotSupported => "CredentialsNotSupported",
            Self::CrossLocationLoggingProhibited => "CrossLocationLoggingProhibited",
            Self::EntityTooSmall => "EntityTooSmall",
            Self::EntityTooLarge => "EntityTooLarge",
            Self::ExpiredToken => "ExpiredToken",
            Self::IllegalVersioningConfigurationException => "IllegalVersioningConfigurationException",
            Self::IncompleteBody => "IncompleteBody",
            Self::IncorrectNumberOfFilesInPostRequest => "IncorrectNumberOfFilesInPostRequest",
            Self::InlineDataTooLarge => "InlineDataTooLarge",
            Self::InternalError => "InternalError",
            Self::InvalidAccessKeyId => "InvalidAccessKeyId",
            Self::InvalidAddressingHeader => "InvalidAddressingHeader",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidBucketState => "InvalidBucketState",
            Self::InvalidDigest => "InvalidDigest",
            Self::InvalidEncryptionAlgorithmError => "InvalidEncryptionAlgorithmError",
            Self::InvalidLocationConstraint => "InvalidLocationConstraint",
            Self::InvalidObjectState => "InvalidObjectState",
            Self::InvalidPart => "InvalidPart",
            Self::InvalidPartOrder => "InvalidPartOrder",
            Self::InvalidPayer => "InvalidPayer",
            Self::InvalidPolicyDocument => "InvalidPolicyDocument",
            Self::InvalidRange => "InvalidRange",
            Self::InvalidRequest => "InvalidRequest",
            Self::InvalidSecurity => "InvalidSecurity",
            Self::InvalidSOAPRequest => "InvalidSOAPRequest",
            Self::InvalidStorageClass => "InvalidStorageClass",
            Self::InvalidTargetBucketForLogging => "InvalidTargetBucketForLogging",
            Self::InvalidToken => "InvalidToken",
            Self::InvalidURI => "InvalidURI",
            Self::KeyTooLongError => "KeyTooLongError",
            Self::MalformedACLError => "MalformedACLError",
            Self::MalformedPOSTRequest => "MalformedPOSTRequest",
            Self::MalformedXML => "MalformedXML",
            Self::MaxMessageLengthExceeded => "MaxMessageLengthExceeded",
            Self::MaxPostPreDataLengthExceededError => "MaxPostPreDataLengthExceededError",
            Self::MetadataTooLarge => "MetadataTooLarge",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::MissingAttachment => "MissingAttachment",
            Self::MissingContentLength => "MissingContentLength",
            Self::MissingRequestBodyError => "MissingRequestBodyError",
            Self::MissingSecurityElement => "MissingSecurityElement",
            Self::MissingSecurityHeader => "MissingSecurityHeader",
            Self::NoLoggingStatusForKey => "NoLoggingStatusForKey",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchBucketPolicy => "NoSuchBucketPolicy",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchLifecycleConfiguration => "NoSuchLifecycleConfiguration",
            Self::NoSuchObjectLockConfiguration => "NoSuchObjectLockConfiguration",
            Self::NoSuchTagSet => "NoSuchTagSet",
            Self::NoSuchUpload => "NoSuchUpload",
            Self::NoSuchVersion => "NoSuchVersion",
            Self::NoSuchWebsiteConfiguration => "NoSuchWebsiteConfiguration",
            Self::NotImplemented => "NotImplemented",
            Self::NotSignedUp => "NotSignedUp",
            Self::OperationAborted => "OperationAborted",
            Self::PermanentRedirect => "PermanentRedirect",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::Redirect => "Redirect",
            Self::RequestIsNotMultiPartContent => "RequestIsNotMultiPartContent",
            Self::RequestTimeout => "RequestTimeout",
            Self::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            Self::RequestTorrentOfBucketError => "RequestTorrentOfBucketError",
            Self::RestoreAlreadyInProgress => "RestoreAlreadyInProgress",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            Self::SlowDown => "SlowDown",
            Self::TemporaryRedirect => "TemporaryRedirect",
            Self::TokenRefreshRequired => "TokenRefreshRequired",
            Self::TooManyBuckets => "TooManyBuckets",
            Self::UnexpectedContent => "UnexpectedContent",
            Self::UnresolvableGrantByEmailAddress => "UnresolvableGrantByEmailAddress",
            Self::UserKeyMustBeSpecified => "UserKeyMustBeSpecified",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::PermanentRedirect => http::StatusCode::MOVED_PERMANENTLY,
            Self::Redirect | Self::TemporaryRedirect => http::StatusCode::TEMPORARY_REDIRECT,
            Self::AmbiguousGrantByEmailAddress
            | Self::AuthorizationHeaderMalformed
            | Self::BadDigest
            | Self::CredentialsNotSupported
            | Self::EntityTooSmall
            | Self::EntityTooLarge
            | Self::ExpiredToken
            | Self::IllegalVersioningConfigurationException
            | Self::IncompleteBody
            | Self::IncorrectNumberOfFilesInPostRequest
            | Self::InlineDataTooLarge
            | Self::InvalidAddressingHeader
            | Self::InvalidArgument
            | Self::InvalidBucketName
            | Self::InvalidDigest
            | Self::InvalidEncryptionAlgorithmError
            | Self::InvalidLocationConstraint
            | Self::InvalidPart
            | Self::InvalidPartOrder
            | Self::InvalidPolicyDocument
            | Self::InvalidRequest
            | Self::InvalidSOAPRequest
            | Self::InvalidStorageClass
            | Self::InvalidTargetBucketForLogging
            | Self::InvalidToken
            | Self::InvalidURI
            | Self::KeyTooLongError
            | Self::MalformedACLError
            | Self::MalformedPOSTRequest
            | Self::MalformedXML
            | Self::MaxMessageLengthExceeded
            | Self::MaxPostPreDataLengthExceededError
            | Self::MetadataTooLarge
            | Self::MissingAttachment
            | Self::MissingRequestBodyError
            | Self::MissingSecurityElement
            | Self::MissingSecurityHeader
            | Self::NoLoggingStatusForKey
            | Self::RequestIsNotMultiPartContent
            | Self::RequestTimeout
            | Self::RequestTorrentOfBucketError
            | Self::TokenRefreshRequired
            | Self::TooManyBuckets
            | Self::UnexpectedContent
            | Self::UnresolvableGrantByEmailAddress
            | Self::UserKeyMustBeSpecified => http::StatusCode::BAD_REQUEST,
            Self::AccessDenied
            | Self::AccountProblem
            | Self::CrossLocationLoggingProhibited
            | Self::InvalidAccessKeyId
            | Self::InvalidObjectState
            | Self::InvalidPayer
            | Self::InvalidSecurity
            | Self::NotSignedUp
            | Self::RequestTimeTooSkewed
            | Self::SignatureDoesNotMatch => http::StatusCode::FORBIDDEN,
            Self::NoSuchBucket
            | Self::NoSuchBucketPolicy
            | Self::NoSuchKey
            | Self::NoSuchLifecycleConfiguration
            | Self::NoSuchObjectLockConfiguration
            | Self::NoSuchTagSet
            | Self::NoSuchUpload
            | Self::NoSuchVersion
            | Self::NoSuchWebsiteConfiguration => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BucketAlreadyExists
            | Self::BucketAlreadyOwnedByYou
            | Self::BucketNotEmpty
            | Self::InvalidBucketState
            | Self::OperationAborted
            | Self::RestoreAlreadyInProgress => http::StatusCode::CONFLICT,
            Self::MissingContentLength => http::StatusCode::LENGTH_REQUIRED,
            Self::PreconditionFailed => http::StatusCode::PRECONDITION_FAILED,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable | Self::SlowDown => http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the fixed human-readable message for this error.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub fn message(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access Denied",
            Self::AccountProblem => {
                "There is a problem with your AWS account that prevents the operation from completing successfully"
            }
            Self::AmbiguousGrantByEmailAddress => {
                "The email address you provided is associated with more than one account"
            }
            Self::AuthorizationHeaderMalformed => {
                "The authorization header you provided is invalid"
            }
            Self::BadDigest => "The Content-MD5 you specified did not match what we received",
            Self::BucketAlreadyExists => "The requested bucket name is not available",
            Self::BucketAlreadyOwnedByYou => {
                "The bucket you tried to create already exists, and you own it"
            }
            Self::BucketNotEmpty => "The bucket you tried to delete is not empty",
            Self::CredentialsNotSupported => "This request does not support credentials",
            Self::CrossLocationLoggingProhibited => "Cross-location logging not allowed",
            Self::EntityTooSmall => {
                "Your proposed upload is smaller than the minimum allowed object size"
            }
            Self::EntityTooLarge => "Your proposed upload exceeds the maximum allowed object size",
            Self::ExpiredToken => "The provided token has expired",
            Self::IllegalVersioningConfigurationException => {
                "The versioning configuration specified in the request is invalid"
            }
            Self::IncompleteBody => {
                "You did not provide the number of bytes specified by the Content-Length HTTP header"
            }
            Self::IncorrectNumberOfFilesInPostRequest => {
                "POST requires exactly one file upload per request"
            }
            Self::InlineDataTooLarge => "Inline data exceeds the maximum allowed size",
            Self::InternalError => "We encountered an internal error. Please try again.",
            Self::InvalidAccessKeyId => {
                "The AWS access key ID you provided does not exist in our records"
            }
            Self::InvalidAddressingHeader => "You must specify the Anonymous role",
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidBucketName => "The specified bucket is not valid",
            Self::InvalidBucketState => {
                "The request is not valid with the current state of the bucket"
            }
            Self::InvalidDigest => "The Content-MD5 you specified is not valid",
            Self::InvalidEncryptionAlgorithmError => {
                "The encryption request you specified is not valid"
            }
            Self::InvalidLocationConstraint => "The specified location constraint is not valid",
            Self::InvalidObjectState => {
                "The operation is not valid for the current state of the object"
            }
            Self::InvalidPart => "One or more of the specified parts could not be found",
            Self::InvalidPartOrder => "The list of parts was not in ascending order",
            Self::InvalidPayer => "All access to this object has been disabled",
            Self::InvalidPolicyDocument => {
                "The content of the form does not meet the conditions specified in the policy document"
            }
            Self::InvalidRange => "The requested range cannot be satisfied",
            Self::InvalidRequest => "Invalid Request",
            Self::InvalidSecurity => "The provided security credentials are not valid",
            Self::InvalidSOAPRequest => "The SOAP request body is invalid",
            Self::InvalidStorageClass => "The storage class you specified is not valid",
            Self::InvalidTargetBucketForLogging => {
                "The target bucket for logging does not exist, is not owned by you, or does not have the appropriate grants for the log-delivery group"
            }
            Self::InvalidToken => "The provided token is malformed or otherwise invalid",
            Self::InvalidURI => "Couldn't parse the specified URI",
            Self::KeyTooLongError => "Your key is too long",
            Self::MalformedACLError => {
                "The XML you provided was not well-formed or did not validate against our published schema"
            }
            Self::MalformedPOSTRequest => {
                "The body of your POST request is not well-formed multipart/form-data"
            }
            Self::MalformedXML => {
                "The XML you provided was not well-formed or did not validate against our published schema"
            }
            Self::MaxMessageLengthExceeded => "Your request was too big",
            Self::MaxPostPreDataLengthExceededError => {
                "Your POST request fields preceding the upload file were too large"
            }
            Self::MetadataTooLarge => {
                "Your metadata headers exceed the maximum allowed metadata size"
            }
            Self::MethodNotAllowed => "The specified method is not allowed against this resource",
            Self::MissingAttachment => "A SOAP attachment was expected, but none were found",
            Self::MissingContentLength => "You must provide the Content-Length HTTP header",
            Self::MissingRequestBodyError => "Request body is empty",
            Self::MissingSecurityElement => "The SOAP 1.1 request is missing a security element",
            Self::MissingSecurityHeader => "Your request is missing a required header",
            Self::NoLoggingStatusForKey => {
                "There is no such thing as a logging status subresource for a key"
            }
            Self::NoSuchBucket => "The specified bucket does not exist",
            Self::NoSuchBucketPolicy => "The specified bucket does not have a bucket policy",
            Self::NoSuchKey => "The specified key does not exist",
            Self::NoSuchLifecycleConfiguration => "The lifecycle configuration does not exist",
            Self::NoSuchObjectLockConfiguration => {
                "Object Lock configuration does not exist for this bucket"
            }
            Self::NoSuchTagSet => "The TagSet does not exist",
            Self::NoSuchUpload => "The specified multipart upload does not exist",
            Self::NoSuchVersion => {
                "The version ID specified in the request does not match an existing version"
            }
            Self::NoSuchWebsiteConfiguration => {
                "The specified bucket does not have a website configuration"
            }
            Self::NotImplemented => {
                "A header you provided implies functionality that is not implemented"
            }
            Self::NotSignedUp => "Your account is not signed up for the Amazon S3 service",
            Self::OperationAborted => {
                "A conflicting conditional operation is currently in progress against this resource"
            }
            Self::PermanentRedirect => {
                "The bucket you are attempting to access must be addressed using the specified endpoint"
            }
            Self::PreconditionFailed => {
                "At least one of the preconditions you specified did not hold"
            }
            Self::Redirect => "Temporary redirect",
            Self::RequestIsNotMultiPartContent => {
                "Bucket POST must be of the enclosure-type multipart/form-data"
            }
            Self::RequestTimeout => {
                "Your socket connection to the server was not read from or written to within the timeout period"
            }
            Self::RequestTimeTooSkewed => {
                "The difference between the request time and the server's time is too large"
            }
            Self::RequestTorrentOfBucketError => {
                "Requesting the torrent file of a bucket is not permitted"
            }
            Self::RestoreAlreadyInProgress => "Object restore is already in progress",
            Self::ServiceUnavailable => "Reduce your request rate",
            Self::SignatureDoesNotMatch => {
                "The request signature we calculated does not match the signature you provided"
            }
            Self::SlowDown => "Reduce your request rate",
            Self::TemporaryRedirect => "You are being redirected to the bucket while DNS updates",
            Self::TokenRefreshRequired => "The provided token must be refreshed",
            Self::TooManyBuckets => "You have attempted to create more buckets than allowed",
            Self::UnexpectedContent => "This request does not support content",
            Self::UnresolvableGrantByEmailAddress => {
                "The email address you provided does not match any account on record"
            }
            Self::UserKeyMustBeSpecified => "The bucket POST must contain the specified field name",
        }
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
/// An S3 domain error.
///
/// The wire message and status are looked up from [`S3ErrorCode`]; only the
/// optional context fields are settable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Error {
    code: S3ErrorCode,
    resource: Option<String>,
    key: Option<String>,
    version_id: Option<String>,
    request_id: Option<String>,
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error({}): {}", self.code, self.code.message())
    }
}

impl std::error::Error for S3Error {}

impl From<S3ErrorCode> for S3Error {
    fn from(code: S3ErrorCode) -> Self {
        Self::new(code)
    }
}

impl S3Error {
    /// Create a new error from a code.
    #[must_use]
    pub fn new(code: S3ErrorCode) -> Self {
        Self {
            code,
            resource: None,
            key: None,
            version_id: None,
            request_id: None,
        }
    }

    /// The error code.
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        self.code
    }

    /// The fixed message for the error code.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.code.message()
    }

    /// The fixed HTTP status for the error code.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.code.status_code()
    }

    /// The resource that caused the error.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The object key the error refers to.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The object version the error refers to.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// The request ID stamped on the error.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the object key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the object version.
    #[must_use]
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Set the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket_name: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::NoSuchBucket).with_resource(bucket_name)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::NoSuchKey).with_key(key)
    }

    /// Create a NoSuchUpload error.
    #[must_use]
    pub fn no_such_upload(upload_id: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::NoSuchUpload).with_resource(upload_id)
    }

    /// Create an AccessDenied error.
    #[must_use]
    pub fn access_denied(resource: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::AccessDenied).with_resource(resource)
    }

    /// Create an InternalError error.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(S3ErrorCode::InternalError)
    }

    /// Create an InvalidRequest error.
    #[must_use]
    pub fn invalid_request() -> Self {
        Self::new(S3ErrorCode::InvalidRequest)
    }

    /// Create a MalformedXML error.
    #[must_use]
    pub fn malformed_xml() -> Self {
        Self::new(S3ErrorCode::MalformedXML)
    }

    /// Create an InvalidRange error.
    #[must_use]
    pub fn invalid_range(range: impl Into<String>) -> Self {
        Self::new(S3ErrorCode::InvalidRange).with_resource(range)
    }

    /// Create a SignatureDoesNotMatch error.
    #[must_use]
    pub fn signature_does_not_match() -> Self {
        Self::new(S3ErrorCode::SignatureDoesNotMatch)
    }
}

/// Create an [`S3Error`] from an error code name.
///
/// # Examples
///
/// ```
/// use s3front_model::s3_error;
/// use s3front_model::error::S3ErrorCode;
///
/// let err = s3_error!(NoSuchBucket);
/// assert_eq!(err.code(), S3ErrorCode::NoSuchBucket);
///
/// let err = s3_error!(NoSuchBucket, "photos");
/// assert_eq!(err.resource(), Some("photos"));
/// ```
#[macro_export]
macro_rules! s3_error {
    ($code:ident) => {
        $crate::error::S3Error::new($crate::error::S3ErrorCode::$code)
    };
    ($code:ident, $resource:expr) => {
        $crate::error::S3Error::new($crate::error::S3ErrorCode::$code).with_resource($resource)
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_should_map_codes_to_fixed_status() {
        assert_eq!(S3ErrorCode::NoSuchBucket.status_code(), http::StatusCode::NOT_FOUND);
        assert_eq!(S3ErrorCode::AccessDenied.status_code(), http::StatusCode::FORBIDDEN);
        assert_eq!(
            S3ErrorCode::SignatureDoesNotMatch.status_code(),
            http::StatusCode::FORBIDDEN
        );
        assert_eq!(
            S3ErrorCode::InternalError.status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            S3ErrorCode::InvalidRange.status_code(),
            http::StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            S3ErrorCode::MethodNotAllowed.status_code(),
            http::StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(S3ErrorCode::InvalidRequest.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_have_unique_code_strings() {
        let names: HashSet<&str> = S3ErrorCode::ALL.iter().map(S3ErrorCode::as_str).collect();
        assert_eq!(names.len(), S3ErrorCode::ALL.len());
        assert!(S3ErrorCode::ALL.len() >= 70);
    }

    #[test]
    fn test_should_derive_message_and_status_from_code() {
        let err = S3Error::no_such_key("photo.jpg").with_request_id("req-1");
        assert_eq!(err.code(), S3ErrorCode::NoSuchKey);
        assert_eq!(err.message(), "The specified key does not exist");
        assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.key(), Some("photo.jpg"));
        assert_eq!(err.request_id(), Some("req-1"));
        assert!(err.resource().is_none());
    }

    #[test]
    fn test_should_build_error_with_macro() {
        let err = s3_error!(AccessDenied, "/bucket");
        assert_eq!(err.code(), S3ErrorCode::AccessDenied);
        assert_eq!(err.resource(), Some("/bucket"));
        assert_eq!(err.to_string(), "S3Error(AccessDenied): Access Denied");
    }
}
