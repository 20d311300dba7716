//! Dispatch router: maps a classified request to a host-registered callback.
//!
//! Per request the router runs:
//!
//! 1. the pre-request hook, which may answer the request itself;
//! 2. the callback registered for the operation, else the default handler,
//!    else a generic `InvalidRequest`;
//! 3. the structured payload read (`MalformedXML` on a bad document);
//! 4. rendering of the callback result or error through a [`ResponseWriter`];
//! 5. the post-request hook, whose failures are logged and swallowed.
//!
//! Requests that never classify are answered through
//! [`S3Router::reject_unclassified`], which still runs the post-request hook,
//! with no classified request to hand it.
//!
//! Every path ends in exactly one response. Callback panics are caught and
//! answered as `InternalError`; their detail only reaches the log.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Response, StatusCode};
use s3front_model::{OperationKind, PayloadKind, RequestPayload, S3Error, S3ErrorCode};
use s3front_xml::{S3Serialize, XmlError, XmlRoot, parse_payload, to_document};
use tracing::{debug, error, warn};

use crate::body::{BoxError, ByteStream, S3Body, S3ResponseBody};
use crate::config::DEFAULT_MAX_XML_BODY;
use crate::request::ClassifiedRequest;
use crate::response::{CONTENT_TYPE_TEXT, CONTENT_TYPE_XML, ResponseWriter, SendMode, WriterError};

/// A failure returned by a callback.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A domain error, rendered with its own code and status.
    #[error(transparent)]
    S3(#[from] S3Error),

    /// Anything else. Rendered as `InternalError`; the detail is only logged.
    #[error("Unexpected failure: {0}")]
    Unexpected(BoxError),
}

impl HandlerError {
    /// Wrap an arbitrary error as unexpected.
    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        Self::Unexpected(err.into())
    }
}

impl From<S3ErrorCode> for HandlerError {
    fn from(code: S3ErrorCode) -> Self {
        Self::S3(S3Error::new(code))
    }
}

impl From<XmlError> for HandlerError {
    fn from(err: XmlError) -> Self {
        Self::Unexpected(Box::new(err))
    }
}

/// Body of a callback result.
pub enum OutputBody {
    /// No body.
    Empty,
    /// An XML document, sent as `application/xml`.
    Xml(Bytes),
    /// Plain text, sent as `text/plain`.
    Text(Bytes),
    /// Raw bytes with a caller-chosen content type.
    Bytes {
        /// Payload.
        data: Bytes,
        /// `Content-Type` value.
        content_type: String,
    },
    /// A streamed payload.
    Stream {
        /// Payload chunks.
        stream: ByteStream,
        /// Total length, required for fixed-length responses.
        length: u64,
        /// `Content-Type` value.
        content_type: String,
    },
}

impl fmt::Debug for OutputBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Xml(data) => f.debug_tuple("Xml").field(&data.len()).finish(),
            Self::Text(data) => f.debug_tuple("Text").field(&data.len()).finish(),
            Self::Bytes { data, content_type } => f
                .debug_struct("Bytes")
                .field("len", &data.len())
                .field("content_type", content_type)
                .finish(),
            Self::Stream {
                length,
                content_type,
                ..
            } => f
                .debug_struct("Stream")
                .field("length", length)
                .field("content_type", content_type)
                .finish_non_exhaustive(),
        }
    }
}

/// The value a callback (or a handling pre-hook) returns.
///
/// Status defaults to the operation's success status.
#[derive(Debug)]
pub struct S3Output {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: OutputBody,
}

impl S3Output {
    fn with_body(body: OutputBody) -> Self {
        Self {
            status: None,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// No body.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_body(OutputBody::Empty)
    }

    /// Serialize a response document.
    ///
    /// # Errors
    ///
    /// Serialization failures are unexpected errors.
    pub fn xml<T: S3Serialize + XmlRoot>(value: &T) -> Result<Self, HandlerError> {
        Ok(Self::with_body(OutputBody::Xml(Bytes::from(to_document(value)?))))
    }

    /// A plain-text body.
    #[must_use]
    pub fn text(text: impl Into<Bytes>) -> Self {
        Self::with_body(OutputBody::Text(text.into()))
    }

    /// A raw body with an explicit content type.
    #[must_use]
    pub fn bytes(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self::with_body(OutputBody::Bytes {
            data: data.into(),
            content_type: content_type.into(),
        })
    }

    /// A streamed body of known length.
    #[must_use]
    pub fn stream(stream: ByteStream, length: u64, content_type: impl Into<String>) -> Self {
        Self::with_body(OutputBody::Stream {
            stream,
            length,
            content_type: content_type.into(),
        })
    }

    /// Override the status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a response header. Invalid names or values are dropped; the
    /// headers the writer owns cannot be overridden.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// The status, if overridden.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Extra headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body.
    #[must_use]
    pub fn body(&self) -> &OutputBody {
        &self.body
    }
}

/// What a callback receives.
#[derive(Debug)]
pub struct S3Context {
    /// The classified request.
    pub request: Arc<ClassifiedRequest>,
    /// The deserialized structured body; [`RequestPayload::None`] when the
    /// operation carries none.
    pub payload: RequestPayload,
    /// The request body. For structured operations this holds the raw bytes
    /// the payload was parsed from.
    pub body: S3Body,
}

/// Future returned by callbacks.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<S3Output, HandlerError>> + Send>>;

/// A registered operation callback.
pub type Callback = Arc<dyn Fn(S3Context) -> HandlerFuture + Send + Sync>;

/// Result of the pre-request hook.
#[derive(Debug)]
pub enum PreHookOutcome {
    /// Route the request normally.
    Continue,
    /// Send this output and skip routing.
    Handled(S3Output),
}

/// Future returned by the pre-request hook.
pub type PreHookFuture = Pin<Box<dyn Future<Output = Result<PreHookOutcome, HandlerError>> + Send>>;

/// Runs before routing.
pub type PreHook = Arc<dyn Fn(Arc<ClassifiedRequest>) -> PreHookFuture + Send + Sync>;

/// Runs after the response is final, with its status and the elapsed time.
///
/// The request is `None` when it was rejected before classification
/// completed (malformed `Authorization` or `Range` header).
pub type PostHook = Arc<
    dyn Fn(Option<&ClassifiedRequest>, StatusCode, Duration) -> Result<(), BoxError> + Send + Sync,
>;

/// The callback table plus hooks. Read-only once built.
pub struct S3Router {
    callbacks: HashMap<OperationKind, Callback>,
    default_handler: Option<Callback>,
    pre_hook: Option<PreHook>,
    post_hook: Option<PostHook>,
    max_xml_body: usize,
}

impl fmt::Debug for S3Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<&str> = self.callbacks.keys().map(OperationKind::as_str).collect();
        operations.sort_unstable();
        f.debug_struct("S3Router")
            .field("operations", &operations)
            .field("default_handler", &self.default_handler.is_some())
            .field("pre_hook", &self.pre_hook.is_some())
            .field("post_hook", &self.post_hook.is_some())
            .field("max_xml_body", &self.max_xml_body)
            .finish()
    }
}

impl S3Router {
    /// Start building a router.
    #[must_use]
    pub fn builder() -> S3RouterBuilder {
        S3RouterBuilder::default()
    }

    /// Whether a callback is registered for `operation`.
    #[must_use]
    pub fn has_callback(&self, operation: OperationKind) -> bool {
        self.callbacks.contains_key(&operation)
    }

    /// Cap on structured payload reads.
    #[must_use]
    pub fn max_xml_body(&self) -> usize {
        self.max_xml_body
    }

    /// Route one request and produce its response.
    pub async fn dispatch(
        &self,
        request: Arc<ClassifiedRequest>,
        body: S3Body,
    ) -> Response<S3ResponseBody> {
        let started = Instant::now();
        let writer = ResponseWriter::for_request(&request);
        let response = self.route(&request, &writer, body).await;
        self.run_post_hook(
            Some(request.as_ref()),
            request.request_id(),
            response.status(),
            started.elapsed(),
        );
        response
    }

    /// Answer a request with an error without routing it, still running the
    /// post-request hook.
    pub fn reject(&self, request: &ClassifiedRequest, err: S3Error) -> Response<S3ResponseBody> {
        let started = Instant::now();
        let writer = ResponseWriter::for_request(request);
        let response = writer.error(&decorate(err, request));
        self.run_post_hook(
            Some(request),
            request.request_id(),
            response.status(),
            started.elapsed(),
        );
        response
    }

    /// Answer a request that failed classification.
    ///
    /// `writer` carries the request id and host taken from the raw request;
    /// `started` is when the request arrived. The post-request hook runs with
    /// no classified request.
    pub fn reject_unclassified(
        &self,
        writer: &ResponseWriter,
        err: &S3Error,
        started: Instant,
    ) -> Response<S3ResponseBody> {
        let response = writer.error(err);
        self.run_post_hook(None, writer.request_id(), response.status(), started.elapsed());
        response
    }

    async fn route(
        &self,
        request: &Arc<ClassifiedRequest>,
        writer: &ResponseWriter,
        body: S3Body,
    ) -> Response<S3ResponseBody> {
        if let Some(pre_hook) = &self.pre_hook {
            match guarded(pre_hook(Arc::clone(request))).await {
                Ok(PreHookOutcome::Continue) => {}
                Ok(PreHookOutcome::Handled(output)) => {
                    debug!(request_id = request.request_id(), "Pre-request hook handled request");
                    return render(request, writer, output);
                }
                Err(err) => return fail(request, writer, err),
            }
        }

        let operation = request.operation();
        let Some(callback) = self
            .callbacks
            .get(&operation)
            .or(self.default_handler.as_ref())
        else {
            warn!(
                %operation,
                request_id = request.request_id(),
                "No callback registered for operation"
            );
            return writer.error(&decorate(S3Error::invalid_request(), request));
        };

        let (payload, body) = match self.read_payload(request, body).await {
            Ok(read) => read,
            Err(err) => return writer.error(&decorate(err, request)),
        };

        let ctx = S3Context {
            request: Arc::clone(request),
            payload,
            body,
        };
        match guarded(callback(ctx)).await {
            Ok(output) => render(request, writer, output),
            Err(err) => fail(request, writer, err),
        }
    }

    /// Read and parse the structured payload the operation expects.
    async fn read_payload(
        &self,
        request: &ClassifiedRequest,
        body: S3Body,
    ) -> Result<(RequestPayload, S3Body), S3Error> {
        let Some(kind) = request.operation().payload_kind() else {
            return Ok((RequestPayload::None, body));
        };

        let limit = request.content_length().map_or(self.max_xml_body, |len| {
            usize::try_from(len).map_or(self.max_xml_body, |len| len.min(self.max_xml_body))
        });
        let raw = if request.is_aws_chunked() {
            body.decode_aws_chunked(limit).await?
        } else {
            body.collect_limited(limit).await?
        };

        if kind == PayloadKind::AccessControlPolicy
            && raw.iter().all(u8::is_ascii_whitespace)
            && request.header("x-amz-acl").is_some()
        {
            return Ok((RequestPayload::None, S3Body::from_bytes(raw)));
        }

        match parse_payload(kind, &raw) {
            Ok(payload) => Ok((payload, S3Body::from_bytes(raw))),
            Err(err) => {
                warn!(
                    error = %err,
                    operation = %request.operation(),
                    request_id = request.request_id(),
                    "Malformed XML request body"
                );
                Err(S3Error::malformed_xml())
            }
        }
    }

    fn run_post_hook(
        &self,
        request: Option<&ClassifiedRequest>,
        request_id: &str,
        status: StatusCode,
        elapsed: Duration,
    ) {
        let Some(post_hook) = &self.post_hook else {
            return;
        };
        match std::panic::catch_unwind(AssertUnwindSafe(|| post_hook(request, status, elapsed))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(error = %err, request_id, "Post-request hook failed");
            }
            Err(panic) => {
                error!(
                    panic = panic_message(panic.as_ref()),
                    request_id,
                    "Post-request hook panicked"
                );
            }
        }
    }
}

/// Builder for [`S3Router`].
pub struct S3RouterBuilder {
    callbacks: HashMap<OperationKind, Callback>,
    default_handler: Option<Callback>,
    pre_hook: Option<PreHook>,
    post_hook: Option<PostHook>,
    max_xml_body: usize,
}

impl Default for S3RouterBuilder {
    fn default() -> Self {
        Self {
            callbacks: HashMap::new(),
            default_handler: None,
            pre_hook: None,
            post_hook: None,
            max_xml_body: DEFAULT_MAX_XML_BODY,
        }
    }
}

impl fmt::Debug for S3RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3RouterBuilder")
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

impl S3RouterBuilder {
    /// Register the callback for `operation`, replacing any earlier one.
    #[must_use]
    pub fn on<F, Fut>(mut self, operation: OperationKind, callback: F) -> Self
    where
        F: Fn(S3Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S3Output, HandlerError>> + Send + 'static,
    {
        self.callbacks.insert(operation, boxed(callback));
        self
    }

    /// Register the fallback for operations without a callback.
    #[must_use]
    pub fn default_handler<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(S3Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S3Output, HandlerError>> + Send + 'static,
    {
        self.default_handler = Some(boxed(callback));
        self
    }

    /// Register the pre-request hook.
    #[must_use]
    pub fn pre_hook<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<ClassifiedRequest>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PreHookOutcome, HandlerError>> + Send + 'static,
    {
        self.pre_hook = Some(Arc::new(move |request| -> PreHookFuture {
            Box::pin(hook(request))
        }));
        self
    }

    /// Register the post-request hook.
    #[must_use]
    pub fn post_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&ClassifiedRequest>, StatusCode, Duration) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.post_hook = Some(Arc::new(hook));
        self
    }

    /// Cap structured payload reads at `limit` bytes.
    #[must_use]
    pub fn max_xml_body(mut self, limit: usize) -> Self {
        self.max_xml_body = limit;
        self
    }

    /// Finish the router.
    #[must_use]
    pub fn build(self) -> S3Router {
        S3Router {
            callbacks: self.callbacks,
            default_handler: self.default_handler,
            pre_hook: self.pre_hook,
            post_hook: self.post_hook,
            max_xml_body: self.max_xml_body,
        }
    }
}

fn boxed<F, Fut>(callback: F) -> Callback
where
    F: Fn(S3Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S3Output, HandlerError>> + Send + 'static,
{
    Arc::new(move |ctx| -> HandlerFuture { Box::pin(callback(ctx)) })
}

/// Await `fut`, turning a panic into an unexpected error.
async fn guarded<T, F>(fut: F) -> Result<T, HandlerError>
where
    F: Future<Output = Result<T, HandlerError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(HandlerError::unexpected(format!(
            "callback panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Fill in the context the error envelope reports.
fn decorate(err: S3Error, request: &ClassifiedRequest) -> S3Error {
    let err = if err.resource().is_none() {
        err.with_resource(request.resource())
    } else {
        err
    };
    err.with_request_id(request.request_id())
}

fn fail(
    request: &ClassifiedRequest,
    writer: &ResponseWriter,
    err: HandlerError,
) -> Response<S3ResponseBody> {
    let err = match err {
        HandlerError::S3(err) => {
            debug!(
                code = %err.code(),
                operation = %request.operation(),
                request_id = request.request_id(),
                "Callback returned domain error"
            );
            err
        }
        HandlerError::Unexpected(err) => {
            error!(
                error = %err,
                operation = %request.operation(),
                request_id = request.request_id(),
                "Callback failed unexpectedly"
            );
            S3Error::internal_error()
        }
    };
    writer.error(&decorate(err, request))
}

fn render(
    request: &ClassifiedRequest,
    writer: &ResponseWriter,
    output: S3Output,
) -> Response<S3ResponseBody> {
    let S3Output {
        status,
        headers,
        body,
    } = output;
    let status = status.unwrap_or_else(|| request.operation().success_status());

    let built = match (writer.mode(), body) {
        (_, OutputBody::Empty) => writer.empty(status),
        (SendMode::FixedLength, OutputBody::Xml(data)) => writer.bytes(status, CONTENT_TYPE_XML, data),
        (SendMode::FixedLength, OutputBody::Text(data)) => {
            writer.bytes(status, CONTENT_TYPE_TEXT, data)
        }
        (SendMode::FixedLength, OutputBody::Bytes { data, content_type }) => {
            writer.bytes(status, &content_type, data)
        }
        (
            SendMode::FixedLength,
            OutputBody::Stream {
                stream,
                length,
                content_type,
            },
        ) => writer.stream(status, &content_type, length, stream),
        (SendMode::Chunked, OutputBody::Xml(data)) => {
            writer.chunked_stream(status, CONTENT_TYPE_XML, single(data))
        }
        (SendMode::Chunked, OutputBody::Text(data)) => {
            writer.chunked_stream(status, CONTENT_TYPE_TEXT, single(data))
        }
        (SendMode::Chunked, OutputBody::Bytes { data, content_type }) => {
            writer.chunked_stream(status, &content_type, single(data))
        }
        (
            SendMode::Chunked,
            OutputBody::Stream {
                stream,
                content_type,
                ..
            },
        ) => writer.chunked_stream(status, &content_type, stream),
    };

    match built {
        Ok(mut response) => {
            writer.apply_headers(&mut response, &headers);
            response
        }
        Err(err) => render_failure(request, writer, &err),
    }
}

fn render_failure(
    request: &ClassifiedRequest,
    writer: &ResponseWriter,
    err: &WriterError,
) -> Response<S3ResponseBody> {
    error!(
        error = %err,
        operation = %request.operation(),
        request_id = request.request_id(),
        "Failed to render callback output"
    );
    writer.error(&decorate(S3Error::internal_error(), request))
}

fn single(data: Bytes) -> ByteStream {
    stream::once(async move { Ok(data) }).boxed()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::Method;
    use http_body_util::BodyExt;
    use s3front_model::output::ListAllMyBucketsResult;
    use s3front_model::types::VersioningStatus;

    use super::*;
    use crate::classify::RequestClassifier;

    fn classify(method: Method, uri: &str, headers: &[(&str, &str)]) -> Arc<ClassifiedRequest> {
        let mut builder = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", "localhost");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(()).unwrap();
        Arc::new(
            RequestClassifier::new(Vec::<String>::new(), "us-east-1")
                .classify(&req)
                .unwrap(),
        )
    }

    async fn body_text(resp: Response<S3ResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_should_invoke_registered_callback() {
        let router = S3Router::builder()
            .on(OperationKind::ListBuckets, |_ctx| async {
                S3Output::xml(&ListAllMyBucketsResult::default())
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            CONTENT_TYPE_XML
        );
        assert!(body_text(resp).await.contains("<ListAllMyBucketsResult"));
    }

    #[tokio::test]
    async fn test_should_use_success_status_for_deletes() {
        let router = S3Router::builder()
            .on(OperationKind::ObjectDelete, |_ctx| async { Ok(S3Output::empty()) })
            .build();
        let resp = router
            .dispatch(classify(Method::DELETE, "/b/k", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_should_answer_invalid_request_without_callback() {
        let router = S3Router::builder().build();
        let resp = router
            .dispatch(classify(Method::GET, "/b?acl", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains("<Code>InvalidRequest</Code>"));
    }

    #[tokio::test]
    async fn test_should_fall_back_to_default_handler() {
        let router = S3Router::builder()
            .default_handler(|ctx| async move {
                Ok(S3Output::text(ctx.request.operation().as_str().to_owned()))
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/b?versions", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "BucketReadVersions");
    }

    #[tokio::test]
    async fn test_should_render_domain_errors_with_own_status() {
        let router = S3Router::builder()
            .on(OperationKind::ObjectRead, |_ctx| async {
                Err(HandlerError::from(S3Error::no_such_key("k")))
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/b/k", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let text = body_text(resp).await;
        assert!(text.contains("<Code>NoSuchKey</Code>"));
        assert!(text.contains("<Key>k</Key>"));
    }

    #[tokio::test]
    async fn test_should_hide_unexpected_error_detail() {
        let router = S3Router::builder()
            .on(OperationKind::ObjectRead, |_ctx| async {
                Err(HandlerError::unexpected("disk /dev/sda1 exploded"))
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/b/k", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = body_text(resp).await;
        assert!(text.contains("<Code>InternalError</Code>"));
        assert!(!text.contains("sda1"));
    }

    #[tokio::test]
    async fn test_should_catch_callback_panics() {
        let router = S3Router::builder()
            .on(OperationKind::ObjectRead, |_ctx| async {
                if true {
                    panic!("secret panic detail");
                }
                Ok(S3Output::empty())
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/b/k", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_text(resp).await.contains("secret"));
    }

    #[tokio::test]
    async fn test_should_pass_parsed_payload_to_callback() {
        let router = S3Router::builder()
            .on(OperationKind::BucketWriteVersioning, |ctx| async move {
                match ctx.payload {
                    RequestPayload::VersioningConfiguration(cfg)
                        if cfg.status == Some(VersioningStatus::Enabled) =>
                    {
                        Ok(S3Output::empty())
                    }
                    other => Err(HandlerError::unexpected(format!("{other:?}"))),
                }
            })
            .build();
        let xml = r#"<VersioningConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Status>Enabled</Status></VersioningConfiguration>"#;
        let resp = router
            .dispatch(
                classify(Method::PUT, "/b?versioning", &[]),
                S3Body::from_bytes(xml),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_reject_malformed_payload() {
        let called = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&called);
        let router = S3Router::builder()
            .on(OperationKind::BucketWriteTags, move |_ctx| {
                seen.fetch_add(1, Ordering::SeqCst);
                async { Ok(S3Output::empty()) }
            })
            .build();
        let resp = router
            .dispatch(
                classify(Method::PUT, "/b?tagging", &[]),
                S3Body::from_bytes("<Tagging><TagSet><Tag>"),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains("<Code>MalformedXML</Code>"));
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_should_accept_canned_acl_without_body() {
        let router = S3Router::builder()
            .on(OperationKind::BucketWriteAcl, |ctx| async move {
                assert!(matches!(ctx.payload, RequestPayload::None));
                Ok(S3Output::empty())
            })
            .build();
        let resp = router
            .dispatch(
                classify(Method::PUT, "/b?acl", &[("x-amz-acl", "public-read")]),
                S3Body::empty(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_cap_payload_reads() {
        let router = S3Router::builder()
            .on(OperationKind::BucketWriteTags, |_ctx| async { Ok(S3Output::empty()) })
            .max_xml_body(8)
            .build();
        let resp = router
            .dispatch(
                classify(Method::PUT, "/b?tagging", &[]),
                S3Body::from_bytes("<Tagging><TagSet/></Tagging>"),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains("MaxMessageLengthExceeded"));
    }

    #[tokio::test]
    async fn test_should_short_circuit_on_handled_pre_hook() {
        let router = S3Router::builder()
            .pre_hook(|_request| async {
                Ok(PreHookOutcome::Handled(
                    S3Output::text("maintenance").with_status(StatusCode::SERVICE_UNAVAILABLE),
                ))
            })
            .on(OperationKind::ListBuckets, |_ctx| async {
                Err(HandlerError::unexpected("must not run"))
            })
            .build();
        let resp = router
            .dispatch(classify(Method::GET, "/", &[]), S3Body::empty())
            .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_text(resp).await, "maintenance");
    }

    #[tokio::test]
    async fn test_should_run_post_hook_on_every_path_and_survive_its_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let router = S3Router::builder()
            .post_hook(move |_request, status, _elapsed| {
                counter.fetch_add(1, Ordering::SeqCst);
                if status.is_server_error() {
                    panic!("post hook panic");
                }
                Err("post hook failure".into())
            })
            .on(OperationKind::ObjectRead, |_ctx| async {
                Err(HandlerError::unexpected("boom"))
            })
            .build();

        let ok = router
            .dispatch(classify(Method::GET, "/", &[]), S3Body::empty())
            .await;
        assert_eq!(ok.status(), StatusCode::BAD_REQUEST);
        let failed = router
            .dispatch(classify(Method::GET, "/b/k", &[]), S3Body::empty())
            .await;
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let rejected = router.reject(
            &classify(Method::GET, "/b", &[]),
            S3Error::new(S3ErrorCode::AccessDenied),
        );
        assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_should_run_post_hook_without_request_for_unclassified_rejections() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let router = S3Router::builder()
            .post_hook(move |request, status, _elapsed| {
                log.lock().unwrap().push((request.is_none(), status));
                Ok(())
            })
            .build();

        let writer = ResponseWriter::new(SendMode::FixedLength, "req-1", None);
        let resp = router.reject_unclassified(
            &writer,
            &S3Error::new(S3ErrorCode::AuthorizationHeaderMalformed),
            Instant::now(),
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers().get("x-amz-request-id").unwrap(), "req-1");
        assert_eq!(*seen.lock().unwrap(), vec![(true, StatusCode::BAD_REQUEST)]);
    }

    #[tokio::test]
    async fn test_should_answer_chunked_requests_chunked() {
        let router = S3Router::builder()
            .on(OperationKind::ObjectWrite, |ctx| async move {
                let data = ctx.body.decode_aws_chunked(1024).await?;
                Ok::<_, HandlerError>(S3Output::text(data).with_header("ETag", "\"abc\""))
            })
            .build();
        let request = classify(
            Method::PUT,
            "/b/k",
            &[("x-amz-content-sha256", "STREAMING-AWS4-HMAC-SHA256-PAYLOAD")],
        );
        let resp = router
            .dispatch(
                request,
                S3Body::from_bytes("5;chunk-signature=a\r\nhello\r\n0;chunk-signature=b\r\n\r\n"),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.body().is_chunked());
        assert!(resp.headers().get("content-length").is_none());
        assert_eq!(resp.headers().get("etag").unwrap(), "\"abc\"");
        assert_eq!(body_text(resp).await, "hello");
    }

    #[test]
    fn test_should_convert_error_codes() {
        let err: HandlerError = S3ErrorCode::NoSuchUpload.into();
        assert!(matches!(err, HandlerError::S3(e) if e.code() == S3ErrorCode::NoSuchUpload));
    }
}
