//! Response construction.
//!
//! [`ResponseWriter`] is bound to one request. It fixes the send mode up
//! front (fixed-length or chunked), stamps the invariant headers once, and
//! refuses primitives that belong to the other mode.
//!
//! Invariant headers: `x-amz-request-id`, `x-amz-id-2`, `Host`, `X-Amz-Date`,
//! `Date`.

use std::io;

use bytes::Bytes;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, DATE, HOST, HeaderName, HeaderValue};
use http::{HeaderMap, Response, StatusCode};
use s3front_model::S3Error;
use s3front_xml::error_to_xml;
use tokio::sync::mpsc;
use tracing::error;

use crate::body::{ByteStream, S3ResponseBody};
use crate::request::ClassifiedRequest;

/// `Content-Type` for structured bodies.
pub const CONTENT_TYPE_XML: &str = "application/xml";
/// `Content-Type` for everything else.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

const X_AMZ_REQUEST_ID: &str = "x-amz-request-id";
const X_AMZ_ID_2: &str = "x-amz-id-2";
const X_AMZ_DATE: &str = "x-amz-date";

/// Buffered chunks between a [`ChunkSender`] and the connection.
const CHUNK_CHANNEL_CAPACITY: usize = 16;

/// How a response body is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// `Content-Length` framing.
    FixedLength,
    /// `Transfer-Encoding: chunked`.
    Chunked,
}

impl std::fmt::Display for SendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FixedLength => "fixed-length",
            Self::Chunked => "chunked",
        })
    }
}

/// Errors raised while building a response.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// A primitive of the wrong send mode was called.
    #[error("{actual} send primitive used on a {expected} response")]
    ModeMismatch {
        /// The mode fixed for this request.
        expected: SendMode,
        /// The mode of the primitive that was called.
        actual: SendMode,
    },

    /// The response could not be assembled.
    #[error("Invalid response: {0}")]
    Http(#[from] http::Error),

    /// The receiving side of a chunked body went away.
    #[error("Chunked response receiver dropped")]
    ChannelClosed,
}

/// Whether `name` is one of the headers the writer owns.
#[must_use]
pub fn is_invariant_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        X_AMZ_REQUEST_ID | X_AMZ_ID_2 | X_AMZ_DATE | "host" | "date"
    )
}

/// Builds responses for one request.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    mode: SendMode,
    request_id: String,
    host: Option<String>,
}

impl ResponseWriter {
    /// Create a writer with an explicit mode.
    #[must_use]
    pub fn new(mode: SendMode, request_id: impl Into<String>, host: Option<String>) -> Self {
        Self {
            mode,
            request_id: request_id.into(),
            host,
        }
    }

    /// Create a writer whose mode follows the request framing.
    #[must_use]
    pub fn for_request(request: &ClassifiedRequest) -> Self {
        let mode = if request.is_chunked() {
            SendMode::Chunked
        } else {
            SendMode::FixedLength
        };
        Self::new(
            mode,
            request.request_id(),
            request.host().map(ToOwned::to_owned),
        )
    }

    /// The send mode fixed for this request.
    #[must_use]
    pub fn mode(&self) -> SendMode {
        self.mode
    }

    /// The request ID stamped on every response.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// A response with no body.
    ///
    /// Allowed in both modes: an empty body carries no framing.
    pub fn empty(&self, status: StatusCode) -> Result<Response<S3ResponseBody>, WriterError> {
        let mut response = Response::builder()
            .status(status)
            .body(S3ResponseBody::empty())?;
        self.stamp(response.headers_mut());
        Ok(response)
    }

    /// A fixed-length buffered response.
    pub fn bytes(
        &self,
        status: StatusCode,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<Response<S3ResponseBody>, WriterError> {
        self.require(SendMode::FixedLength)?;
        let data = data.into();
        let mut response = Response::builder()
            .status(status)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, data.len())
            .body(S3ResponseBody::from_bytes(data))?;
        self.stamp(response.headers_mut());
        Ok(response)
    }

    /// A fixed-length streamed response.
    pub fn stream(
        &self,
        status: StatusCode,
        content_type: &str,
        length: u64,
        stream: ByteStream,
    ) -> Result<Response<S3ResponseBody>, WriterError> {
        self.require(SendMode::FixedLength)?;
        let mut response = Response::builder()
            .status(status)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, length)
            .body(S3ResponseBody::Stream { stream, length })?;
        self.stamp(response.headers_mut());
        Ok(response)
    }

    /// A chunked response fed through the returned [`ChunkSender`].
    ///
    /// The terminal chunk is written once the sender is finished or dropped.
    pub fn chunked(
        &self,
        status: StatusCode,
        content_type: &str,
    ) -> Result<(Response<S3ResponseBody>, ChunkSender), WriterError> {
        self.require(SendMode::Chunked)?;
        let (tx, mut rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let body = stream::poll_fn(move |cx| rx.poll_recv(cx)).boxed();
        let response = self.chunked_stream(status, content_type, body)?;
        Ok((response, ChunkSender { tx }))
    }

    /// A chunked response drawn from an existing stream.
    pub fn chunked_stream(
        &self,
        status: StatusCode,
        content_type: &str,
        stream: ByteStream,
    ) -> Result<Response<S3ResponseBody>, WriterError> {
        self.require(SendMode::Chunked)?;
        let mut response = Response::builder()
            .status(status)
            .header(CONTENT_TYPE, content_type)
            .body(S3ResponseBody::Chunked(stream))?;
        self.stamp(response.headers_mut());
        Ok(response)
    }

    /// The XML error envelope for `err`, in whichever mode applies.
    ///
    /// Never fails; a response that cannot be assembled degrades to a bare
    /// 500.
    #[must_use]
    pub fn error(&self, err: &S3Error) -> Response<S3ResponseBody> {
        let xml = Bytes::from(error_to_xml(err, &self.request_id));
        let status = err.status_code();
        let built = match self.mode {
            SendMode::FixedLength => self.bytes(status, CONTENT_TYPE_XML, xml),
            SendMode::Chunked => self.chunked_stream(
                status,
                CONTENT_TYPE_XML,
                stream::once(async move { Ok(xml) }).boxed(),
            ),
        };
        built.unwrap_or_else(|e| {
            error!(error = %e, request_id = %self.request_id, "Failed to build error response");
            let mut response = Response::new(S3ResponseBody::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            self.stamp(response.headers_mut());
            response
        })
    }

    /// Copy callback-supplied headers, skipping the ones the writer owns.
    pub fn apply_headers(&self, response: &mut Response<S3ResponseBody>, extra: &HeaderMap) {
        let headers = response.headers_mut();
        for (name, value) in extra {
            if is_invariant_header(name) || *name == CONTENT_LENGTH {
                continue;
            }
            if *name == CONTENT_TYPE {
                headers.insert(CONTENT_TYPE, value.clone());
            } else {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    fn require(&self, actual: SendMode) -> Result<(), WriterError> {
        if self.mode == actual {
            return Ok(());
        }
        error!(
            expected = %self.mode,
            actual = %actual,
            request_id = %self.request_id,
            "Response send mode mismatch"
        );
        Err(WriterError::ModeMismatch {
            expected: self.mode,
            actual,
        })
    }

    fn stamp(&self, headers: &mut HeaderMap) {
        let now = Utc::now();
        if let Ok(id) = HeaderValue::from_str(&self.request_id) {
            headers.insert(X_AMZ_REQUEST_ID, id.clone());
            headers.insert(X_AMZ_ID_2, id);
        }
        let host = self
            .host
            .as_deref()
            .and_then(|h| HeaderValue::from_str(h).ok())
            .unwrap_or_else(|| HeaderValue::from_static(""));
        headers.insert(HOST, host);
        if let Ok(v) = HeaderValue::from_str(&now.format("%Y%m%dT%H%M%SZ").to_string()) {
            headers.insert(X_AMZ_DATE, v);
        }
        if let Ok(v) = HeaderValue::from_str(&now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()) {
            headers.insert(DATE, v);
        }
    }
}

/// Feeds the body of a chunked response.
#[derive(Debug)]
pub struct ChunkSender {
    tx: mpsc::Sender<Result<Bytes, io::Error>>,
}

impl ChunkSender {
    /// Send one intermediate chunk. Empty chunks are skipped, since an empty
    /// chunk would terminate the body.
    pub async fn send_chunk(&self, data: impl Into<Bytes>) -> Result<(), WriterError> {
        let data = data.into();
        if data.is_empty() {
            return Ok(());
        }
        self.tx
            .send(Ok(data))
            .await
            .map_err(|_| WriterError::ChannelClosed)
    }

    /// End the body with the terminal chunk.
    pub fn finish(self) {
        drop(self.tx);
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use s3front_model::S3ErrorCode;

    use super::*;

    fn fixed() -> ResponseWriter {
        ResponseWriter::new(SendMode::FixedLength, "req-1", Some("localhost:8000".to_owned()))
    }

    fn chunked() -> ResponseWriter {
        ResponseWriter::new(SendMode::Chunked, "req-2", Some("localhost:8000".to_owned()))
    }

    fn header<'a>(resp: &'a Response<S3ResponseBody>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_should_stamp_invariant_headers_once() {
        let resp = fixed().bytes(StatusCode::OK, CONTENT_TYPE_TEXT, "hi").unwrap();
        for name in ["x-amz-request-id", "x-amz-id-2", "host", "x-amz-date", "date"] {
            assert_eq!(resp.headers().get_all(name).iter().count(), 1, "{name}");
        }
        assert_eq!(header(&resp, "x-amz-request-id"), Some("req-1"));
        assert_eq!(header(&resp, "host"), Some("localhost:8000"));
        assert_eq!(header(&resp, "content-length"), Some("2"));
        assert!(header(&resp, "date").is_some_and(|d| d.ends_with(" GMT")));
        assert_eq!(header(&resp, "x-amz-date").map(str::len), Some(16));
    }

    #[test]
    fn test_should_refuse_chunked_primitives_in_fixed_mode() {
        let err = fixed().chunked(StatusCode::OK, CONTENT_TYPE_TEXT).unwrap_err();
        assert!(matches!(
            err,
            WriterError::ModeMismatch {
                expected: SendMode::FixedLength,
                actual: SendMode::Chunked
            }
        ));
    }

    #[test]
    fn test_should_refuse_fixed_primitives_in_chunked_mode() {
        let err = chunked().bytes(StatusCode::OK, CONTENT_TYPE_TEXT, "x").unwrap_err();
        assert!(matches!(err, WriterError::ModeMismatch { .. }));
        let err = chunked()
            .stream(StatusCode::OK, CONTENT_TYPE_TEXT, 0, stream::empty().boxed())
            .unwrap_err();
        assert!(matches!(err, WriterError::ModeMismatch { .. }));
    }

    #[test]
    fn test_should_allow_empty_in_both_modes() {
        assert_eq!(fixed().empty(StatusCode::NO_CONTENT).unwrap().status(), 204);
        assert_eq!(chunked().empty(StatusCode::OK).unwrap().status(), 200);
    }

    #[tokio::test]
    async fn test_should_render_error_envelope() {
        let resp = fixed().error(&S3Error::no_such_bucket("photos"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&resp, "content-type"), Some(CONTENT_TYPE_XML));
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("<Code>NoSuchBucket</Code>"));
        assert!(text.contains("<RequestId>req-1</RequestId>"));
    }

    #[tokio::test]
    async fn test_should_render_error_chunked_in_chunked_mode() {
        let resp = chunked().error(&S3Error::new(S3ErrorCode::AccessDenied));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.body().is_chunked());
        assert!(header(&resp, "content-length").is_none());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("<Code>AccessDenied</Code>"));
    }

    #[tokio::test]
    async fn test_should_send_chunks_then_terminate() {
        let (resp, sender) = chunked().chunked(StatusCode::OK, CONTENT_TYPE_TEXT).unwrap();
        let task = tokio::spawn(async move {
            sender.send_chunk("hello ").await.unwrap();
            sender.send_chunk(Bytes::new()).await.unwrap();
            sender.send_chunk("world").await.unwrap();
            sender.finish();
        });
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        task.await.unwrap();
        assert_eq!(body.as_ref(), b"hello world");
    }

    #[test]
    fn test_should_not_override_invariant_headers() {
        let writer = fixed();
        let mut resp = writer.empty(StatusCode::OK).unwrap();
        let mut extra = HeaderMap::new();
        extra.insert("x-amz-request-id", HeaderValue::from_static("forged"));
        extra.insert("etag", HeaderValue::from_static("\"abc\""));
        writer.apply_headers(&mut resp, &extra);
        assert_eq!(header(&resp, "x-amz-request-id"), Some("req-1"));
        assert_eq!(header(&resp, "etag"), Some("\"abc\""));
    }
}
