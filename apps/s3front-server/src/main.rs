//! s3front reference server.
//!
//! Serves the s3front gateway pipeline over HTTP/1.1 and HTTP/2 with a
//! handful of sample callbacks, so the classifier, signature checks and
//! response writer can be exercised with any S3 client.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8000 S3_BASE_DOMAINS=s3.local S3_SAMPLE_BUCKETS=photos s3front-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8000` | Bind address |
//! | `S3_BASE_DOMAINS` | *(empty)* | Virtual-hosted base domains, comma-separated |
//! | `S3_ENFORCE_SIGNATURES` | `false` | Require a valid SigV2/SigV4 signature |
//! | `S3_SAMPLE_BUCKETS` | *(empty)* | Buckets the sample callbacks report |
//! | `ACCESS_KEY` / `SECRET_KEY` | *(unset)* | Static credentials (falls back to `AWS_*`) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use s3front_auth::{CredentialProvider, StaticCredentialProvider};
use s3front_http::{GatewayConfig, S3HttpService, S3Router};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::handler::Catalog;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build a credential provider from `ACCESS_KEY` / `SECRET_KEY`, falling back
/// to the standard AWS variables.
fn build_credential_provider(
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<Arc<dyn CredentialProvider>> {
    let access_key = lookup("ACCESS_KEY").or_else(|| lookup("AWS_ACCESS_KEY_ID"))?;
    let secret_key = lookup("SECRET_KEY").or_else(|| lookup("AWS_SECRET_ACCESS_KEY"))?;

    info!(access_key = %access_key, "configured credential provider from environment");

    Some(Arc::new(StaticCredentialProvider::from_pair(
        access_key, secret_key,
    )))
}

/// Assemble the service: sample callbacks, a timing post-hook and optional
/// credentials.
fn build_service(
    config: GatewayConfig,
    catalog: Catalog,
    credentials: Option<Arc<dyn CredentialProvider>>,
) -> S3HttpService {
    let router = handler::register(S3Router::builder(), Arc::new(catalog))
        .post_hook(|request, status, elapsed| {
            match request {
                Some(request) => debug!(
                    request_id = %request.request_id(),
                    operation = %request.operation(),
                    status = status.as_u16(),
                    elapsed_ms = elapsed.as_millis(),
                    "request finished",
                ),
                None => debug!(
                    status = status.as_u16(),
                    elapsed_ms = elapsed.as_millis(),
                    "unclassified request rejected",
                ),
            }
            Ok(())
        })
        .max_xml_body(config.max_xml_body)
        .build();

    let service = S3HttpService::new(router, config);
    match credentials {
        Some(provider) => service.with_credentials(provider),
        None => service,
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: S3HttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        base_domains = ?config.base_domains,
        region = %config.region,
        enforce_signatures = config.enforce_signatures,
        version = VERSION,
        "starting s3front server",
    );

    let catalog = std::env::var("S3_SAMPLE_BUCKETS")
        .map(|list| Catalog::from_list(&list))
        .unwrap_or_default();
    let credentials = build_credential_provider(|name| std::env::var(name).ok());
    if config.enforce_signatures && credentials.is_none() {
        warn!("signature enforcement is on but no credentials are configured");
    }

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let service = build_service(config, catalog, credentials);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
