//! Decoder for the AWS streaming-signature body envelope.
//!
//! Clients that sign with `STREAMING-AWS4-HMAC-SHA256-PAYLOAD` frame the body
//! as a sequence of signed chunks:
//!
//! ```text
//! <hex-size>;chunk-signature=<sig>\r\n
//! <data>\r\n
//! ...
//! 0;chunk-signature=<sig>\r\n
//! \r\n
//! ```
//!
//! Chunk signatures are not verified here; the seed signature on the
//! request already covers the envelope.

use bytes::{Bytes, BytesMut};
use s3front_model::{S3Error, S3ErrorCode};
use tracing::debug;

/// One parsed chunk header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader<'a> {
    /// Declared data length.
    pub size: usize,
    /// `chunk-signature` extension, if present.
    pub signature: Option<&'a str>,
}

/// Parse `<hex-size>[;chunk-signature=<sig>][;ext...]`.
pub fn parse_chunk_header(line: &[u8]) -> Result<ChunkHeader<'_>, S3Error> {
    let line = std::str::from_utf8(line).map_err(|_| malformed("non-UTF-8 chunk header"))?;
    let mut fields = line.split(';');
    let size_field = fields.next().unwrap_or_default().trim();
    let size = usize::from_str_radix(size_field, 16)
        .map_err(|_| malformed("invalid chunk size"))?;
    let signature = fields.find_map(|ext| ext.trim().strip_prefix("chunk-signature="));
    Ok(ChunkHeader { size, signature })
}

/// Strip the chunk envelope and return the object bytes.
///
/// # Errors
///
/// Returns `InvalidArgument` when a header line is missing or malformed, a
/// chunk is shorter than declared, or a chunk is not followed by CRLF.
pub fn decode_aws_chunked(body: &[u8]) -> Result<Bytes, S3Error> {
    let mut output = BytesMut::with_capacity(body.len());
    let mut pos = 0;
    let mut chunks = 0usize;

    loop {
        let line_end = find_crlf(body, pos).ok_or_else(|| malformed("missing chunk header"))?;
        let header = parse_chunk_header(&body[pos..line_end])?;
        pos = line_end + 2;

        if header.size == 0 {
            break;
        }

        let data_end = pos
            .checked_add(header.size)
            .filter(|&end| end <= body.len())
            .ok_or_else(|| malformed("chunk data truncated"))?;
        output.extend_from_slice(&body[pos..data_end]);
        pos = data_end;

        if body.get(pos..pos + 2) != Some(b"\r\n".as_slice()) {
            return Err(malformed("missing CRLF after chunk data"));
        }
        pos += 2;
        chunks += 1;
    }

    debug!(chunks, decoded = output.len(), "Decoded aws-chunked body");
    Ok(output.freeze())
}

fn malformed(reason: &str) -> S3Error {
    debug!(reason, "Malformed aws-chunked body");
    S3Error::new(S3ErrorCode::InvalidArgument)
}

/// Position of the next `\r\n` at or after `start`.
fn find_crlf(data: &[u8], start: usize) -> Option<usize> {
    data.get(start..)?
        .windows(2)
        .position(|w| w == b"\r\n")
        .map(|p| start + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_chunk_header_with_signature() {
        let header = parse_chunk_header(b"400;chunk-signature=0055627c").unwrap();
        assert_eq!(header.size, 1024);
        assert_eq!(header.signature, Some("0055627c"));

        let bare = parse_chunk_header(b"a").unwrap();
        assert_eq!(bare.size, 10);
        assert_eq!(bare.signature, None);
    }

    #[test]
    fn test_should_decode_multiple_chunks() {
        let body = b"5;chunk-signature=aaa\r\nhello\r\n6;chunk-signature=bbb\r\n world\r\n0;chunk-signature=ccc\r\n\r\n";
        assert_eq!(decode_aws_chunked(body).unwrap().as_ref(), b"hello world");
    }

    #[test]
    fn test_should_decode_terminal_chunk_only() {
        assert!(decode_aws_chunked(b"0;chunk-signature=abc\r\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_should_reject_malformed_envelopes() {
        for body in [
            b"5;chunk-signature=abc".as_slice(),
            b"10;chunk-signature=abc\r\nshort\r\n",
            b"zz\r\nhello\r\n0\r\n\r\n",
            b"5\r\nhelloXX0\r\n\r\n",
        ] {
            let err = decode_aws_chunked(body).unwrap_err();
            assert_eq!(err.code(), S3ErrorCode::InvalidArgument);
        }
    }
}
