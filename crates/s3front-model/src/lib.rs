//! Data model for the s3front gateway.
//!
//! - [`error`]: the closed [`S3ErrorCode`] table and the [`S3Error`] domain error.
//! - [`operation`]: [`OperationKind`] and the permission and response facts derived from it.
//! - [`request`]: addressing style and signature version.
//! - [`types`]: request payloads (ACL, tagging, versioning, legal hold, retention,
//!   multi-object delete, multipart completion).
//! - [`output`]: response documents.

pub mod error;
pub mod operation;
pub mod output;
pub mod request;
pub mod types;

pub use error::{S3Error, S3ErrorCode};
pub use operation::{OperationKind, PayloadKind, RequiredPermission};
pub use request::{AddressingStyle, SignatureVersion};
pub use types::RequestPayload;
