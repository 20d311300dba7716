//! HTTP layer of the s3front gateway.
//!
//! - **Classification** ([`classify`]): turns a raw request into a
//!   [`ClassifiedRequest`](request::ClassifiedRequest): addressing style,
//!   bucket and key, query markers, range, authorization fields, and the
//!   resolved [`OperationKind`](s3front_model::OperationKind).
//!
//! - **Dispatch** ([`dispatch`]): the [`S3Router`](dispatch::S3Router) callback
//!   table with pre/post hooks, payload parsing, and error rendering.
//!
//! - **Responses** ([`response`]): the [`ResponseWriter`](response::ResponseWriter)
//!   send primitives and invariant headers.
//!
//! - **Bodies** ([`body`], [`codec`]): the inbound [`S3Body`](body::S3Body), the
//!   outbound [`S3ResponseBody`](body::S3ResponseBody), and the aws-chunked
//!   decoder.
//!
//! - **Service** ([`service`]): [`S3HttpService`](service::S3HttpService), the
//!   hyper `Service` tying it all together.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> S3HttpService (hyper Service)
//!     -> RequestClassifier
//!     -> signature enforcement (optional)
//!     -> S3Router: pre-hook -> callback | default | InvalidRequest -> post-hook
//!     -> ResponseWriter (fixed-length or chunked)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use s3front_http::config::GatewayConfig;
//! use s3front_http::dispatch::{S3Output, S3Router};
//! use s3front_http::service::S3HttpService;
//! use s3front_model::OperationKind;
//!
//! let router = S3Router::builder()
//!     .on(OperationKind::ServiceExists, |_ctx| async { Ok(S3Output::empty()) })
//!     .build();
//! let service = S3HttpService::new(router, GatewayConfig::default());
//! // Serve `service` with hyper.
//! ```

// S3Error carries its optional context inline; it is returned on every
// fallible path and boxing it would only add indirection.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod classify;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod service;

pub use body::{S3Body, S3ResponseBody};
pub use classify::{ClassifyError, RequestClassifier};
pub use config::GatewayConfig;
pub use dispatch::{HandlerError, PreHookOutcome, S3Context, S3Output, S3Router};
pub use request::{ByteRange, ClassifiedRequest, SubResource};
pub use response::{ChunkSender, ResponseWriter, SendMode, WriterError};
pub use service::S3HttpService;
