//! S3 XML deserialization: parsing request bodies into model types.
//!
//! Every parse is fallible and returns [`XmlError`]; the router maps any
//! failure onto `MalformedXML`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use s3front_model::PayloadKind;
use s3front_model::types::{
    AccessControlPolicy, CompleteMultipartUpload, CompletedPart, DeleteMultiple, Grant, Grantee,
    LegalHold, LegalHoldStatus, MfaDeleteStatus, ObjectIdentifier, Owner, Permission,
    RequestPayload, Retention, RetentionMode, Tag, Tagging, VersioningConfiguration,
    VersioningStatus,
};

use crate::error::XmlError;
use crate::serialize::XmlRoot;

/// Trait for deserializing S3 types from XML.
///
/// The opening tag has already been consumed by the caller; the
/// implementation reads child elements until the matching end tag.
pub trait S3Deserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize an S3 XML document into a typed value.
///
/// The root element must match `T::ROOT_ELEMENT`.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed, the root element is wrong, or
/// deserialization fails.
pub fn from_xml<T: S3Deserialize + XmlRoot>(xml: &[u8]) -> Result<T, XmlError> {
    // Text is not trimmed: whitespace around entity references is content.
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().expand_empty_elements = true;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                if name != T::ROOT_ELEMENT {
                    return Err(XmlError::UnexpectedElement(name));
                }
                let value = T::deserialize_xml(&mut reader)?;
                expect_document_end(&mut reader)?;
                return Ok(value);
            }
            Event::Eof => {
                return Err(XmlError::MissingElement(T::ROOT_ELEMENT.to_owned()));
            }
            // Skip declaration, comments, processing instructions, whitespace.
            _ => {}
        }
    }
}

/// Parse a request body into the payload shape an operation expects.
///
/// # Errors
///
/// Returns `XmlError` if the body is not a well-formed document of that shape.
pub fn parse_payload(kind: PayloadKind, body: &[u8]) -> Result<RequestPayload, XmlError> {
    let payload = match kind {
        PayloadKind::AccessControlPolicy => RequestPayload::AccessControlPolicy(from_xml(body)?),
        PayloadKind::Tagging => RequestPayload::Tagging(from_xml(body)?),
        PayloadKind::VersioningConfiguration => {
            RequestPayload::VersioningConfiguration(from_xml(body)?)
        }
        PayloadKind::LegalHold => RequestPayload::LegalHold(from_xml(body)?),
        PayloadKind::Retention => RequestPayload::Retention(from_xml(body)?),
        PayloadKind::DeleteMultiple => RequestPayload::DeleteMultiple(from_xml(body)?),
        PayloadKind::CompleteMultipartUpload => {
            RequestPayload::CompleteMultipartUpload(from_xml(body)?)
        }
    };
    Ok(payload)
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

/// Element name without any namespace prefix.
fn local_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_owned)
        .map_err(|err| XmlError::ParseError(err.to_string()))
}

/// Only trailing comments and whitespace may follow the root element.
fn expect_document_end(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(()),
            Event::Start(e) | Event::Empty(e) => {
                return Err(XmlError::UnexpectedElement(local_name(&e)?));
            }
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::GeneralRef(e) => {
                let name = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&resolve_reference(&name)?);
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Start(e) => {
                return Err(XmlError::UnexpectedElement(local_name(&e)?));
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Resolve `&name;` or `&#NN;` / `&#xHH;` found inside text.
fn resolve_reference(name: &str) -> Result<String, XmlError> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        }
        .map_err(|e| XmlError::ParseError(format!("invalid character reference '{name}': {e}")))?;
        return char::from_u32(value)
            .map(String::from)
            .ok_or_else(|| XmlError::ParseError(format!("invalid character reference '{name}'")));
    }
    quick_xml::escape::resolve_xml_entity(name)
        .map(str::to_owned)
        .ok_or_else(|| XmlError::ParseError(format!("unknown entity '{name}'")))
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Walk the children of the current element, handing each opening tag to
/// `on_child`. Returns after the matching end tag.
fn read_children<F>(
    reader: &mut Reader<&[u8]>,
    context: &str,
    mut on_child: F,
) -> Result<(), XmlError>
where
    F: FnMut(&mut Reader<&[u8]>, &str, &BytesStart<'_>) -> Result<(), XmlError>,
{
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                on_child(reader, &name, &e)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in {context}"
                )));
            }
            Event::Text(e) => {
                let text = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                if !text.trim().is_empty() {
                    return Err(XmlError::UnexpectedElement(format!(
                        "stray text in {context}"
                    )));
                }
            }
            _ => {}
        }
    }
}

/// Parse a boolean from XML text ("true"/"false").
fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XmlError::ParseError(format!("invalid boolean: {s}"))),
    }
}

/// Parse an ISO 8601 timestamp from XML text.
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, XmlError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}

fn required<T>(value: Option<T>, element: &str) -> Result<T, XmlError> {
    value.ok_or_else(|| XmlError::MissingElement(element.to_owned()))
}

/// The `xsi:type` attribute of a `<Grantee>` start tag, if present.
fn grantee_type(e: &BytesStart<'_>) -> Result<Option<String>, XmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"type" {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// S3Deserialize implementations
// ---------------------------------------------------------------------------

impl S3Deserialize for Owner {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut owner = Owner::default();
        read_children(reader, "Owner", |reader, name, _| {
            match name {
                "ID" => owner.id = Some(read_text_content(reader)?),
                "DisplayName" => owner.display_name = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(owner)
    }
}

/// Reads `<Grantee>` children once the `xsi:type` is known.
///
/// Without an `xsi:type` the kind is inferred from which identifier is present.
fn read_grantee(reader: &mut Reader<&[u8]>, xsi_type: Option<&str>) -> Result<Grantee, XmlError> {
    let mut id = None;
    let mut display_name = None;
    let mut uri = None;
    let mut email_address = None;
    read_children(reader, "Grantee", |reader, name, _| {
        match name {
            "ID" => id = Some(read_text_content(reader)?),
            "DisplayName" => display_name = Some(read_text_content(reader)?),
            "URI" => uri = Some(read_text_content(reader)?),
            "EmailAddress" => email_address = Some(read_text_content(reader)?),
            _ => skip_element(reader)?,
        }
        Ok(())
    })?;

    let kind = match xsi_type {
        Some(kind) => kind,
        None if uri.is_some() => "Group",
        None if email_address.is_some() => "AmazonCustomerByEmail",
        None => "CanonicalUser",
    };
    match kind {
        "CanonicalUser" => Ok(Grantee::CanonicalUser {
            id: required(id, "ID")?,
            display_name,
        }),
        "Group" => Ok(Grantee::Group {
            uri: required(uri, "URI")?,
        }),
        "AmazonCustomerByEmail" => Ok(Grantee::AmazonCustomerByEmail {
            email_address: required(email_address, "EmailAddress")?,
        }),
        other => Err(XmlError::ParseError(format!("unknown grantee type: {other}"))),
    }
}

impl S3Deserialize for Grant {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut grantee = None;
        let mut permission = None;
        read_children(reader, "Grant", |reader, name, start| {
            match name {
                "Grantee" => {
                    let xsi_type = grantee_type(start)?;
                    grantee = Some(read_grantee(reader, xsi_type.as_deref())?);
                }
                "Permission" => {
                    let text = read_text_content(reader)?;
                    permission = Some(Permission::parse(&text).ok_or_else(|| {
                        XmlError::ParseError(format!("invalid permission: {text}"))
                    })?);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(Grant {
            grantee: required(grantee, "Grantee")?,
            permission: required(permission, "Permission")?,
        })
    }
}

impl S3Deserialize for AccessControlPolicy {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut policy = AccessControlPolicy::default();
        read_children(reader, "AccessControlPolicy", |reader, name, _| {
            match name {
                "Owner" => policy.owner = Some(Owner::deserialize_xml(reader)?),
                "AccessControlList" => {
                    read_children(reader, "AccessControlList", |reader, name, _| {
                        match name {
                            "Grant" => policy.grants.push(Grant::deserialize_xml(reader)?),
                            other => return Err(XmlError::UnexpectedElement(other.to_owned())),
                        }
                        Ok(())
                    })?;
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(policy)
    }
}

impl S3Deserialize for Tag {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        let mut value = None;
        read_children(reader, "Tag", |reader, name, _| {
            match name {
                "Key" => key = Some(read_text_content(reader)?),
                "Value" => value = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(Tag {
            key: required(key, "Key")?,
            value: value.unwrap_or_default(),
        })
    }
}

impl S3Deserialize for Tagging {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut tag_set = None;
        read_children(reader, "Tagging", |reader, name, _| {
            match name {
                "TagSet" => {
                    let mut tags = Vec::new();
                    read_children(reader, "TagSet", |reader, name, _| {
                        match name {
                            "Tag" => tags.push(Tag::deserialize_xml(reader)?),
                            other => return Err(XmlError::UnexpectedElement(other.to_owned())),
                        }
                        Ok(())
                    })?;
                    tag_set = Some(tags);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(Tagging {
            tag_set: required(tag_set, "TagSet")?,
        })
    }
}

impl S3Deserialize for VersioningConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = VersioningConfiguration::default();
        read_children(reader, "VersioningConfiguration", |reader, name, _| {
            match name {
                "Status" => {
                    let text = read_text_content(reader)?;
                    config.status = Some(match text.as_str() {
                        "Enabled" => VersioningStatus::Enabled,
                        "Suspended" => VersioningStatus::Suspended,
                        _ => return Err(XmlError::ParseError(format!("invalid status: {text}"))),
                    });
                }
                "MfaDelete" => {
                    let text = read_text_content(reader)?;
                    config.mfa_delete = Some(match text.as_str() {
                        "Enabled" => MfaDeleteStatus::Enabled,
                        "Disabled" => MfaDeleteStatus::Disabled,
                        _ => {
                            return Err(XmlError::ParseError(format!("invalid MfaDelete: {text}")));
                        }
                    });
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(config)
    }
}

impl S3Deserialize for LegalHold {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut status = None;
        read_children(reader, "LegalHold", |reader, name, _| {
            match name {
                "Status" => {
                    let text = read_text_content(reader)?;
                    status = Some(match text.as_str() {
                        "ON" => LegalHoldStatus::On,
                        "OFF" => LegalHoldStatus::Off,
                        _ => return Err(XmlError::ParseError(format!("invalid status: {text}"))),
                    });
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(LegalHold {
            status: required(status, "Status")?,
        })
    }
}

impl S3Deserialize for Retention {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut retention = Retention::default();
        read_children(reader, "Retention", |reader, name, _| {
            match name {
                "Mode" => {
                    let text = read_text_content(reader)?;
                    retention.mode = Some(match text.as_str() {
                        "GOVERNANCE" => RetentionMode::Governance,
                        "COMPLIANCE" => RetentionMode::Compliance,
                        _ => return Err(XmlError::ParseError(format!("invalid mode: {text}"))),
                    });
                }
                "RetainUntilDate" => {
                    let text = read_text_content(reader)?;
                    retention.retain_until_date = Some(parse_timestamp(&text)?);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(retention)
    }
}

impl S3Deserialize for ObjectIdentifier {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        let mut version_id = None;
        read_children(reader, "Object", |reader, name, _| {
            match name {
                "Key" => key = Some(read_text_content(reader)?),
                "VersionId" => version_id = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(ObjectIdentifier {
            key: required(key, "Key")?,
            version_id,
        })
    }
}

impl S3Deserialize for DeleteMultiple {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut delete = DeleteMultiple::default();
        read_children(reader, "Delete", |reader, name, _| {
            match name {
                "Object" => delete
                    .objects
                    .push(ObjectIdentifier::deserialize_xml(reader)?),
                "Quiet" => delete.quiet = parse_bool(&read_text_content(reader)?)?,
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        if delete.objects.is_empty() {
            return Err(XmlError::MissingElement("Object".to_owned()));
        }
        Ok(delete)
    }
}

impl S3Deserialize for CompletedPart {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut part_number = None;
        let mut etag = None;
        read_children(reader, "Part", |reader, name, _| {
            match name {
                "PartNumber" => {
                    let text = read_text_content(reader)?;
                    part_number = Some(text.parse::<u32>().map_err(|e| {
                        XmlError::ParseError(format!("invalid part number '{text}': {e}"))
                    })?);
                }
                "ETag" => etag = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(CompletedPart {
            part_number: required(part_number, "PartNumber")?,
            etag: required(etag, "ETag")?,
        })
    }
}

impl S3Deserialize for CompleteMultipartUpload {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut upload = CompleteMultipartUpload::default();
        read_children(reader, "CompleteMultipartUpload", |reader, name, _| {
            match name {
                "Part" => upload.parts.push(CompletedPart::deserialize_xml(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_tagging() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <Tagging xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
              <TagSet>
                <Tag><Key>env</Key><Value>prod</Value></Tag>
                <Tag><Key>team</Key><Value>a &amp; b</Value></Tag>
              </TagSet>
            </Tagging>"#;
        let tagging: Tagging = from_xml(xml).expect("valid tagging");
        assert_eq!(tagging.tag_set.len(), 2);
        assert_eq!(tagging.tag_set[0].key, "env");
        assert_eq!(tagging.tag_set[1].value, "a & b");
    }

    #[test]
    fn test_should_parse_acl_grantee_variants() {
        let xml = br#"<AccessControlPolicy>
              <Owner><ID>owner</ID></Owner>
              <AccessControlList>
                <Grant>
                  <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="CanonicalUser">
                    <ID>user</ID><DisplayName>alice</DisplayName>
                  </Grantee>
                  <Permission>FULL_CONTROL</Permission>
                </Grant>
                <Grant>
                  <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="Group">
                    <URI>http://acs.amazonaws.com/groups/global/AllUsers</URI>
                  </Grantee>
                  <Permission>READ</Permission>
                </Grant>
                <Grant>
                  <Grantee><EmailAddress>bob@example.com</EmailAddress></Grantee>
                  <Permission>WRITE_ACP</Permission>
                </Grant>
              </AccessControlList>
            </AccessControlPolicy>"#;
        let policy: AccessControlPolicy = from_xml(xml).expect("valid acl");
        assert_eq!(policy.owner.and_then(|o| o.id).as_deref(), Some("owner"));
        assert_eq!(policy.grants.len(), 3);
        assert_eq!(
            policy.grants[0].grantee,
            Grantee::CanonicalUser {
                id: "user".to_owned(),
                display_name: Some("alice".to_owned()),
            }
        );
        assert_eq!(policy.grants[1].permission, Permission::Read);
        assert!(matches!(policy.grants[1].grantee, Grantee::Group { .. }));
        assert_eq!(
            policy.grants[2].grantee,
            Grantee::AmazonCustomerByEmail {
                email_address: "bob@example.com".to_owned(),
            }
        );
    }

    #[test]
    fn test_should_reject_unknown_permission() {
        let xml = br#"<AccessControlPolicy><AccessControlList><Grant>
              <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="CanonicalUser"><ID>u</ID></Grantee>
              <Permission>EVERYTHING</Permission>
            </Grant></AccessControlList></AccessControlPolicy>"#;
        assert!(from_xml::<AccessControlPolicy>(xml).is_err());
    }

    #[test]
    fn test_should_reject_wrong_root_element() {
        let xml = b"<Tagging><TagSet/></Tagging>";
        assert!(matches!(
            from_xml::<LegalHold>(xml),
            Err(XmlError::UnexpectedElement(name)) if name == "Tagging"
        ));
    }

    #[test]
    fn test_should_accept_self_closing_tag_set() {
        let tagging: Tagging = from_xml(b"<Tagging><TagSet/></Tagging>").expect("valid tagging");
        assert!(tagging.tag_set.is_empty());
    }

    #[test]
    fn test_should_reject_truncated_document() {
        let xml = b"<Tagging><TagSet><Tag><Key>a</Key>";
        assert!(from_xml::<Tagging>(xml).is_err());
    }

    #[test]
    fn test_should_reject_empty_body() {
        assert!(matches!(
            from_xml::<Tagging>(b""),
            Err(XmlError::MissingElement(_))
        ));
    }

    #[test]
    fn test_should_parse_delete_multiple() {
        let xml = br#"<Delete>
              <Quiet>true</Quiet>
              <Object><Key>a.txt</Key></Object>
              <Object><Key>b.txt</Key><VersionId>v2</VersionId></Object>
            </Delete>"#;
        let delete: DeleteMultiple = from_xml(xml).expect("valid delete");
        assert!(delete.quiet);
        assert_eq!(delete.objects.len(), 2);
        assert_eq!(delete.objects[1].version_id.as_deref(), Some("v2"));
    }

    #[test]
    fn test_should_parse_retention_and_legal_hold() {
        let xml = br"<Retention><Mode>GOVERNANCE</Mode><RetainUntilDate>2030-01-01T00:00:00.000Z</RetainUntilDate></Retention>";
        let retention: Retention = from_xml(xml).expect("valid retention");
        assert_eq!(retention.mode, Some(RetentionMode::Governance));
        assert!(retention.retain_until_date.is_some());

        let hold: LegalHold = from_xml(b"<LegalHold><Status>OFF</Status></LegalHold>")
            .expect("valid legal hold");
        assert_eq!(hold.status, LegalHoldStatus::Off);
    }

    #[test]
    fn test_should_dispatch_payload_by_kind() {
        let xml = b"<VersioningConfiguration><Status>Enabled</Status></VersioningConfiguration>";
        let payload =
            parse_payload(PayloadKind::VersioningConfiguration, xml).expect("valid payload");
        assert_eq!(
            payload,
            RequestPayload::VersioningConfiguration(VersioningConfiguration {
                status: Some(VersioningStatus::Enabled),
                mfa_delete: None,
            })
        );

        let xml = b"<CompleteMultipartUpload><Part><PartNumber>1</PartNumber><ETag>\"abc\"</ETag></Part></CompleteMultipartUpload>";
        let payload =
            parse_payload(PayloadKind::CompleteMultipartUpload, xml).expect("valid payload");
        assert!(matches!(
            payload,
            RequestPayload::CompleteMultipartUpload(ref upload) if upload.parts[0].etag == "\"abc\""
        ));
    }
}
