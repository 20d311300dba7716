//! S3 XML serialization: converting model types to S3-compatible XML.
//!
//! Implementors of [`S3Serialize`] write child elements; [`to_xml`] and
//! [`to_document`] wrap them in the declaration and the namespaced root.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3front_model::output::{
    Bucket, CompleteMultipartUploadResult, DeleteError, DeleteResult, DeletedObject,
    InitiateMultipartUploadResult, ListAllMyBucketsResult, ListBucketResult, LocationConstraint,
    Object,
};
use s3front_model::types::{
    AccessControlPolicy, Grant, Grantee, LegalHold, Owner, Retention, Tag, Tagging,
    VersioningConfiguration,
};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Trait for serializing S3 types to XML.
///
/// Implementors write their content as child elements inside the current XML
/// context. Uses `io::Result` because `quick_xml::Writer` closures require it.
pub trait S3Serialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// A type that is a complete document with a fixed root element.
pub trait XmlRoot {
    /// The root element name.
    const ROOT_ELEMENT: &'static str;
}

/// Serialize a value as S3-compatible XML with declaration and namespace.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: S3Serialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

/// Serialize a document type under its own root element.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_document<T: S3Serialize + XmlRoot>(value: &T) -> Result<Vec<u8>, XmlError> {
    to_xml(T::ROOT_ELEMENT, value)
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

/// Format a `DateTime<Utc>` as ISO 8601 with milliseconds and `Z` suffix.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

impl S3Serialize for Owner {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Owner").write_inner_content(|w| {
            write_optional_text(w, "ID", self.id.as_deref())?;
            write_optional_text(w, "DisplayName", self.display_name.as_deref())?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Grantee {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("Grantee")
            .with_attribute(("xmlns:xsi", XSI_NAMESPACE))
            .with_attribute(("xsi:type", self.xsi_type()))
            .write_inner_content(|w| {
                match self {
                    Grantee::CanonicalUser { id, display_name } => {
                        write_text_element(w, "ID", id)?;
                        write_optional_text(w, "DisplayName", display_name.as_deref())?;
                    }
                    Grantee::Group { uri } => write_text_element(w, "URI", uri)?,
                    Grantee::AmazonCustomerByEmail { email_address } => {
                        write_text_element(w, "EmailAddress", email_address)?;
                    }
                }
                Ok(())
            })?;
        Ok(())
    }
}

impl S3Serialize for Grant {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Grant").write_inner_content(|w| {
            self.grantee.serialize_xml(w)?;
            write_text_element(w, "Permission", self.permission.as_str())?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for AccessControlPolicy {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref owner) = self.owner {
            owner.serialize_xml(writer)?;
        }
        writer
            .create_element("AccessControlList")
            .write_inner_content(|w| {
                for grant in &self.grants {
                    grant.serialize_xml(w)?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

impl S3Serialize for Tag {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Tag").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "Value", &self.value)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Tagging {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("TagSet").write_inner_content(|w| {
            for tag in &self.tag_set {
                tag.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for VersioningConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(writer, "Status", self.status.as_ref().map(|s| s.as_str()))?;
        write_optional_text(
            writer,
            "MfaDelete",
            self.mfa_delete.as_ref().map(|s| s.as_str()),
        )?;
        Ok(())
    }
}

impl S3Serialize for LegalHold {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Status", self.status.as_str())
    }
}

impl S3Serialize for Retention {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(writer, "Mode", self.mode.as_ref().map(|m| m.as_str()))?;
        if let Some(ref until) = self.retain_until_date {
            write_text_element(writer, "RetainUntilDate", &format_timestamp(until))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output documents
// ---------------------------------------------------------------------------

impl S3Serialize for Bucket {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Bucket").write_inner_content(|w| {
            write_text_element(w, "Name", &self.name)?;
            write_text_element(w, "CreationDate", &format_timestamp(&self.creation_date))?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for ListAllMyBucketsResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref owner) = self.owner {
            owner.serialize_xml(writer)?;
        }
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                bucket.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Object {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Contents").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "LastModified", &format_timestamp(&self.last_modified))?;
            write_text_element(w, "ETag", &self.etag)?;
            write_text_element(w, "Size", &self.size.to_string())?;
            write_text_element(w, "StorageClass", &self.storage_class)?;
            if let Some(ref owner) = self.owner {
                owner.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for ListBucketResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or_default())?;
        write_optional_text(writer, "Marker", self.marker.as_deref())?;
        write_optional_text(
            writer,
            "ContinuationToken",
            self.continuation_token.as_deref(),
        )?;
        write_optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        write_optional_text(
            writer,
            "NextContinuationToken",
            self.next_continuation_token.as_deref(),
        )?;
        for object in &self.contents {
            object.serialize_xml(writer)?;
        }
        for prefix in &self.common_prefixes {
            writer
                .create_element("CommonPrefixes")
                .write_inner_content(|w| write_text_element(w, "Prefix", prefix))?;
        }
        Ok(())
    }
}

impl S3Serialize for LocationConstraint {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref region) = self.region {
            writer.write_event(Event::Text(BytesText::new(region)))?;
        }
        Ok(())
    }
}

impl S3Serialize for DeletedObject {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Deleted").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_optional_text(w, "VersionId", self.version_id.as_deref())?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for DeleteError {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Error").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_optional_text(w, "VersionId", self.version_id.as_deref())?;
            write_text_element(w, "Code", &self.code)?;
            write_text_element(w, "Message", &self.message)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for DeleteResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for deleted in &self.deleted {
            deleted.serialize_xml(writer)?;
        }
        for error in &self.errors {
            error.serialize_xml(writer)?;
        }
        Ok(())
    }
}

impl S3Serialize for InitiateMultipartUploadResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "UploadId", &self.upload_id)?;
        Ok(())
    }
}

impl S3Serialize for CompleteMultipartUploadResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Location", &self.location)?;
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "ETag", &self.etag)?;
        Ok(())
    }
}

macro_rules! impl_xml_root {
    ($($ty:ty => $root:literal),+ $(,)?) => {
        $(
            impl XmlRoot for $ty {
                const ROOT_ELEMENT: &'static str = $root;
            }
        )+
    };
}

impl_xml_root!(
    AccessControlPolicy => "AccessControlPolicy",
    Tagging => "Tagging",
    VersioningConfiguration => "VersioningConfiguration",
    LegalHold => "LegalHold",
    Retention => "Retention",
    ListAllMyBucketsResult => "ListAllMyBucketsResult",
    ListBucketResult => "ListBucketResult",
    LocationConstraint => "LocationConstraint",
    DeleteResult => "DeleteResult",
    InitiateMultipartUploadResult => "InitiateMultipartUploadResult",
    CompleteMultipartUploadResult => "CompleteMultipartUploadResult",
    s3front_model::types::DeleteMultiple => "Delete",
    s3front_model::types::CompleteMultipartUpload => "CompleteMultipartUpload",
);

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use s3front_model::types::{LegalHoldStatus, Permission, VersioningStatus};

    use super::*;

    fn render<T: S3Serialize + XmlRoot>(value: &T) -> String {
        String::from_utf8(to_document(value).expect("serialize")).expect("valid UTF-8")
    }

    #[test]
    fn test_should_write_declaration_and_namespace() {
        let xml = render(&Tagging {
            tag_set: vec![Tag {
                key: "env".to_owned(),
                value: "prod".to_owned(),
            }],
        });
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<Tagging xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"><TagSet><Tag>\
             <Key>env</Key><Value>prod</Value></Tag></TagSet></Tagging>"
        ));
    }

    #[test]
    fn test_should_write_grantee_variants_with_xsi_type() {
        let policy = AccessControlPolicy {
            owner: Some(Owner {
                id: Some("owner-id".to_owned()),
                display_name: None,
            }),
            grants: vec![
                Grant {
                    grantee: Grantee::CanonicalUser {
                        id: "user-id".to_owned(),
                        display_name: Some("alice".to_owned()),
                    },
                    permission: Permission::FullControl,
                },
                Grant {
                    grantee: Grantee::Group {
                        uri: "http://acs.amazonaws.com/groups/global/AllUsers".to_owned(),
                    },
                    permission: Permission::Read,
                },
            ],
        };
        let xml = render(&policy);
        assert!(xml.contains("xsi:type=\"CanonicalUser\""));
        assert!(xml.contains("<ID>user-id</ID><DisplayName>alice</DisplayName>"));
        assert!(xml.contains("xsi:type=\"Group\""));
        assert!(xml.contains("<URI>http://acs.amazonaws.com/groups/global/AllUsers</URI>"));
        assert!(xml.contains("<Permission>FULL_CONTROL</Permission>"));
        assert!(xml.contains("<Owner><ID>owner-id</ID></Owner>"));
    }

    #[test]
    fn test_should_write_bucket_listing_timestamps() {
        let result = ListAllMyBucketsResult {
            owner: None,
            buckets: vec![Bucket {
                name: "photos".to_owned(),
                creation_date: chrono::Utc
                    .with_ymd_and_hms(2006, 2, 3, 16, 45, 9)
                    .single()
                    .expect("valid date"),
            }],
        };
        let xml = render(&result);
        assert!(xml.contains(
            "<Buckets><Bucket><Name>photos</Name>\
             <CreationDate>2006-02-03T16:45:09.000Z</CreationDate></Bucket></Buckets>"
        ));
    }

    #[test]
    fn test_should_write_location_as_root_text() {
        let xml = render(&LocationConstraint {
            region: Some("eu-west-1".to_owned()),
        });
        assert!(xml.contains(">eu-west-1</LocationConstraint>"));

        let xml = render(&LocationConstraint::default());
        assert!(xml.contains("<LocationConstraint xmlns="));
    }

    #[test]
    fn test_should_write_simple_configuration_documents() {
        let xml = render(&VersioningConfiguration {
            status: Some(VersioningStatus::Suspended),
            mfa_delete: None,
        });
        assert!(xml.contains("<Status>Suspended</Status>"));
        assert!(!xml.contains("MfaDelete"));

        let xml = render(&LegalHold {
            status: LegalHoldStatus::On,
        });
        assert!(xml.contains("<Status>ON</Status>"));
    }

    #[test]
    fn test_should_write_listing_with_common_prefixes() {
        let result = ListBucketResult {
            name: "photos".to_owned(),
            delimiter: Some("/".to_owned()),
            max_keys: 1000,
            common_prefixes: vec!["2024/".to_owned()],
            ..ListBucketResult::default()
        };
        let xml = render(&result);
        assert!(xml.contains("<Prefix></Prefix>"));
        assert!(xml.contains("<MaxKeys>1000</MaxKeys><IsTruncated>false</IsTruncated>"));
        assert!(xml.contains("<CommonPrefixes><Prefix>2024/</Prefix></CommonPrefixes>"));
    }
}
