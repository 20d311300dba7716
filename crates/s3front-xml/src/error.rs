//! XML error type and the `<Error>` envelope.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3front_model::S3Error;

/// Errors that can occur during S3 XML serialization or deserialization.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

/// Format an S3 error as the flat `<Error>` document.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchKey</Code>
///   <Message>The specified key does not exist</Message>
///   <Key>photo.jpg</Key>
///   <RequestId>4442587FB7D0A2F9</RequestId>
/// </Error>
/// ```
///
/// The request ID on the error wins over `request_id` when both are present.
pub fn error_to_xml(err: &S3Error, request_id: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    let request_id = err.request_id().unwrap_or(request_id);
    if let Err(e) = write_error_xml(&mut buf, err, request_id) {
        tracing::error!(error = %e, "failed to serialize S3 error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(buf: &mut Vec<u8>, err: &S3Error, request_id: &str) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(err.code().as_str()))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(err.message()))?;
        if let Some(key) = err.key() {
            w.create_element("Key")
                .write_text_content(BytesText::new(key))?;
        }
        if let Some(version_id) = err.version_id() {
            w.create_element("VersionId")
                .write_text_content(BytesText::new(version_id))?;
        }
        if let Some(res) = err.resource() {
            w.create_element("Resource")
                .write_text_content(BytesText::new(res))?;
        }
        w.create_element("RequestId")
            .write_text_content(BytesText::new(request_id))?;
        Ok(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use s3front_model::S3ErrorCode;

    use super::*;

    #[test]
    fn test_should_format_error_with_resource() {
        let err = S3Error::no_such_bucket("/mybucket");
        let xml = error_to_xml(&err, "tx000001");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml_str.contains("<Code>NoSuchBucket</Code>"));
        assert!(xml_str.contains("<Message>The specified bucket does not exist</Message>"));
        assert!(xml_str.contains("<Resource>/mybucket</Resource>"));
        assert!(xml_str.contains("<RequestId>tx000001</RequestId>"));
    }

    #[test]
    fn test_should_format_error_with_key_and_version() {
        let err = S3Error::no_such_key("a/b.txt").with_version_id("v1");
        let xml = error_to_xml(&err, "tx000002");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("<Key>a/b.txt</Key>"));
        assert!(xml_str.contains("<VersionId>v1</VersionId>"));
        assert!(!xml_str.contains("<Resource>"));
    }

    #[test]
    fn test_should_prefer_request_id_carried_by_error() {
        let err = S3Error::new(S3ErrorCode::InternalError).with_request_id("inner");
        let xml = error_to_xml(&err, "outer");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("<RequestId>inner</RequestId>"));
    }

    #[test]
    fn test_should_escape_special_characters() {
        let err = S3Error::access_denied("/my&bucket/<key>");
        let xml = error_to_xml(&err, "tx000003");
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("/my&amp;bucket/&lt;key&gt;"));
    }
}
