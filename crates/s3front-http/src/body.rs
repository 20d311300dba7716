//! Request and response body types.
//!
//! - [`S3Body`]: the inbound body handed to callbacks. It can be streamed,
//!   collected under a size limit, or unwrapped from the aws-chunked envelope.
//! - [`S3ResponseBody`]: the outbound body. Buffered, empty, known-length
//!   stream, or chunked stream.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use http_body::{Body, Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{
    BodyDataStream, BodyExt, Collected, Empty, Full, LengthLimitError, Limited,
};
use s3front_model::{S3Error, S3ErrorCode};

use crate::codec;

/// Boxed error produced by body implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A stream of body chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, io::Error>>;

type CollectFuture = Pin<Box<dyn Future<Output = Result<Collected<Bytes>, BoxError>> + Send>>;

/// The inbound request body.
pub struct S3Body {
    inner: UnsyncBoxBody<Bytes, BoxError>,
}

impl fmt::Debug for S3Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Body")
            .field("size_hint", &self.inner.size_hint())
            .finish()
    }
}

impl Default for S3Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl S3Body {
    /// Wrap any `http_body::Body` yielding `Bytes`.
    pub fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self {
            inner: body.map_err(Into::into).boxed_unsync(),
        }
    }

    /// A body with no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new())
    }

    /// A body holding `data`.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::new(Full::new(data.into()))
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteBody` when the transport fails mid-read.
    pub async fn collect(self) -> Result<Bytes, S3Error> {
        self.inner
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .map_err(|_| S3Error::new(S3ErrorCode::IncompleteBody))
    }

    /// Read the whole body, refusing more than `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns `MaxMessageLengthExceeded` past the limit and `IncompleteBody`
    /// when the transport fails mid-read.
    pub async fn collect_limited(self, limit: usize) -> Result<Bytes, S3Error> {
        // Boxed to fix the future's `Send` bound at a concrete type.
        let collect: CollectFuture = Box::pin(Limited::new(self.inner, limit).collect());
        match collect.await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                Err(S3Error::new(S3ErrorCode::MaxMessageLengthExceeded))
            }
            Err(_) => Err(S3Error::new(S3ErrorCode::IncompleteBody)),
        }
    }

    /// Read at most `limit` bytes and strip the aws-chunked envelope.
    ///
    /// ```
    /// use s3front_http::S3Body;
    ///
    /// # tokio_test::block_on(async {
    /// let body = S3Body::from_bytes("5;chunk-signature=ab\r\nhello\r\n0;chunk-signature=cd\r\n\r\n");
    /// let data = body.decode_aws_chunked(1024).await.unwrap();
    /// assert_eq!(&data[..], b"hello");
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// As [`collect_limited`](Self::collect_limited), plus `InvalidArgument`
    /// for a malformed envelope.
    pub async fn decode_aws_chunked(self, limit: usize) -> Result<Bytes, S3Error> {
        let raw = self.collect_limited(limit).await?;
        codec::decode_aws_chunked(&raw)
    }

    /// Stream the data frames; trailers are dropped.
    #[must_use]
    pub fn into_stream(self) -> ByteStream {
        BodyDataStream::new(self.inner)
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed()
    }
}

/// The outbound response body.
///
/// Implements [`http_body::Body`] so it can be used directly with hyper
/// responses.
#[derive(Default)]
pub enum S3ResponseBody {
    /// XML documents, error envelopes, small raw payloads.
    Buffered(Full<Bytes>),
    /// HEAD answers, 204 responses.
    #[default]
    Empty,
    /// A stream whose total length is declared up front.
    Stream {
        /// Data chunks.
        stream: ByteStream,
        /// Declared length, also sent as `Content-Length`.
        length: u64,
    },
    /// A stream of unknown length, sent with chunked transfer encoding.
    Chunked(ByteStream),
}

impl fmt::Debug for S3ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(full) => f.debug_tuple("Buffered").field(full).finish(),
            Self::Empty => f.write_str("Empty"),
            Self::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish_non_exhaustive()
            }
            Self::Chunked(_) => f.write_str("Chunked(..)"),
        }
    }
}

impl S3ResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Whether this body is sent with chunked transfer encoding.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        matches!(self, Self::Chunked(_))
    }
}

impl Body for S3ResponseBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
            Self::Stream { stream, .. } | Self::Chunked(stream) => stream
                .poll_next_unpin(cx)
                .map(|item| item.map(|chunk| chunk.map(Frame::data))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
            Self::Stream { length, .. } => *length == 0,
            Self::Chunked(_) => false,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => SizeHint::with_exact(0),
            Self::Stream { length, .. } => SizeHint::with_exact(*length),
            Self::Chunked(_) => SizeHint::default(),
        }
    }
}
