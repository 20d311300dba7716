//! The hyper-facing service.
//!
//! [`S3HttpService`] runs the whole pipeline for each request:
//!
//! 1. classification (malformed `Authorization`/`Range` answered here, still
//!    through the router's post-request hook);
//! 2. optional signature enforcement;
//! 3. dispatch through the [`S3Router`].

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use hyper::body::Incoming;
use hyper::service::Service;
use s3front_auth::{AuthError, CredentialProvider, authenticate};
use s3front_model::{S3Error, S3ErrorCode};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::body::{BoxError, S3Body, S3ResponseBody};
use crate::classify::RequestClassifier;
use crate::config::GatewayConfig;
use crate::dispatch::S3Router;
use crate::request::ClassifiedRequest;
use crate::response::{ResponseWriter, SendMode};

/// The S3 gateway as a hyper [`Service`].
///
/// Cheap to clone; all state is shared and read-only.
pub struct S3HttpService {
    router: Arc<S3Router>,
    classifier: Arc<RequestClassifier>,
    config: Arc<GatewayConfig>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl fmt::Debug for S3HttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3HttpService")
            .field("router", &self.router)
            .field("classifier", &self.classifier)
            .field("config", &self.config)
            .field("credentials", &self.credentials.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Clone for S3HttpService {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            classifier: Arc::clone(&self.classifier),
            config: Arc::clone(&self.config),
            credentials: self.credentials.clone(),
        }
    }
}

impl S3HttpService {
    /// Create a service from a router and gateway settings.
    #[must_use]
    pub fn new(router: S3Router, config: GatewayConfig) -> Self {
        Self {
            router: Arc::new(router),
            classifier: Arc::new(RequestClassifier::from_config(&config)),
            config: Arc::new(config),
            credentials: None,
        }
    }

    /// Attach the secret-key lookup used when signatures are enforced.
    #[must_use]
    pub fn with_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// The gateway settings.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run one request through the pipeline.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<S3ResponseBody>
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let started = Instant::now();
        let (parts, body) = req.into_parts();

        let request = match self.classifier.classify_parts(&parts) {
            Ok(request) => Arc::new(request),
            Err(err) => {
                let request_id = Uuid::new_v4().to_string();
                warn!(
                    method = %parts.method,
                    uri = %parts.uri,
                    error = %err,
                    request_id,
                    "Rejected unclassifiable request"
                );
                let host = parts
                    .headers
                    .get(http::header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(ToOwned::to_owned);
                let writer = ResponseWriter::new(SendMode::FixedLength, &request_id, host);
                let err = err.to_s3_error().with_request_id(request_id.as_str());
                return self.router.reject_unclassified(&writer, &err, started);
            }
        };

        info!(
            operation = %request.operation(),
            style = %request.addressing_style(),
            bucket = ?request.bucket(),
            key = ?request.key(),
            signature = %request.signature_version(),
            request_id = request.request_id(),
            "Classified S3 request"
        );

        if self.config.enforce_signatures {
            if let Err(err) = self.enforce(&request) {
                return self.router.reject(&request, err);
            }
        }

        self.router.dispatch(request, S3Body::new(body)).await
    }

    /// Verify the request signature.
    fn enforce(&self, request: &ClassifiedRequest) -> Result<(), S3Error> {
        let Some(input) = request.signing_input() else {
            warn!(request_id = request.request_id(), "Anonymous request refused");
            return Err(S3Error::access_denied(request.resource()));
        };
        let Some(provider) = self.credentials.as_deref() else {
            warn!(
                request_id = request.request_id(),
                "Signature enforcement is on but no credentials are configured"
            );
            return Err(S3Error::new(S3ErrorCode::InvalidAccessKeyId));
        };

        match authenticate(&input, provider, self.config.verify_policy()) {
            Ok(result) => {
                debug!(
                    access_key_id = %result.access_key_id,
                    request_id = request.request_id(),
                    "Request authenticated"
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, request_id = request.request_id(), "Authentication failed");
                Err(match err {
                    AuthError::AccessKeyNotFound(_) => S3Error::new(S3ErrorCode::InvalidAccessKeyId),
                    AuthError::SignatureDoesNotMatch => S3Error::signature_does_not_match(),
                    _ => S3Error::new(S3ErrorCode::AuthorizationHeaderMalformed),
                })
            }
        }
    }
}

impl Service<http::Request<Incoming>> for S3HttpService {
    type Response = http::Response<S3ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}
