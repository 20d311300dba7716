//! S3 XML serialization/deserialization for s3front.
//!
//! This crate converts between the `s3front-model` types and the S3 RestXml
//! wire format.
//!
//! # Key components
//!
//! - [`S3Serialize`] and [`to_document`] for response bodies
//! - [`S3Deserialize`], [`from_xml`] and [`parse_payload`] for request bodies
//! - [`error_to_xml`] for the `<Error>` envelope
//!
//! # S3 XML conventions
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/`
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 format (`2006-02-03T16:45:09.000Z`)
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{S3Deserialize, from_xml, parse_payload};
pub use error::{XmlError, error_to_xml};
pub use serialize::{S3_NAMESPACE, S3Serialize, XmlRoot, to_document, to_xml};
