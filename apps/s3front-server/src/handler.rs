//! Sample callbacks answering from a fixed bucket catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use s3front_http::dispatch::S3RouterBuilder;
use s3front_http::{HandlerError, S3Output};
use s3front_model::output::{Bucket, ListAllMyBucketsResult};
use s3front_model::types::Owner;
use s3front_model::{OperationKind, S3Error, S3ErrorCode};

/// Owner reported in bucket listings.
const OWNER_ID: &str = "s3front";

/// Buckets the sample host pretends to hold.
#[derive(Debug, Default)]
pub struct Catalog {
    buckets: BTreeMap<String, DateTime<Utc>>,
}

impl Catalog {
    /// A catalog of `names`, all created now.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        Self {
            buckets: names.into_iter().map(|n| (n.into(), now)).collect(),
        }
    }

    /// Parse a comma-separated bucket list.
    pub fn from_list(list: &str) -> Self {
        Self::from_names(list.split(',').map(str::trim).filter(|n| !n.is_empty()))
    }

    fn contains(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    fn listing(&self) -> ListAllMyBucketsResult {
        ListAllMyBucketsResult {
            owner: Some(Owner {
                id: Some(OWNER_ID.to_owned()),
                display_name: Some(OWNER_ID.to_owned()),
            }),
            buckets: self
                .buckets
                .iter()
                .map(|(name, created)| Bucket {
                    name: name.clone(),
                    creation_date: *created,
                })
                .collect(),
        }
    }
}

/// Install the sample callbacks on `builder`.
///
/// Anything without a callback answers `NotImplemented`.
pub fn register(builder: S3RouterBuilder, catalog: Arc<Catalog>) -> S3RouterBuilder {
    let list_catalog = Arc::clone(&catalog);
    builder
        .on(OperationKind::ListBuckets, move |_ctx| {
            let listing = list_catalog.listing();
            async move { S3Output::xml(&listing) }
        })
        .on(OperationKind::ServiceExists, |_ctx| async {
            Ok(S3Output::empty())
        })
        .on(OperationKind::BucketExists, move |ctx| {
            let bucket = ctx.request.bucket().unwrap_or_default().to_owned();
            let known = catalog.contains(&bucket);
            async move {
                if known {
                    Ok(S3Output::empty())
                } else {
                    Err(HandlerError::from(S3Error::no_such_bucket(bucket)))
                }
            }
        })
        .default_handler(|_ctx| async {
            Err(HandlerError::from(S3Error::new(S3ErrorCode::NotImplemented)))
        })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{Method, Request, StatusCode};
    use http_body_util::{BodyExt, Full};
    use s3front_http::{GatewayConfig, S3HttpService, S3Router};

    use super::*;

    fn service(list: &str) -> S3HttpService {
        let router = register(S3Router::builder(), Arc::new(Catalog::from_list(list))).build();
        S3HttpService::new(router, GatewayConfig::default())
    }

    fn request(method: Method, uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", "localhost:8000")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_should_parse_bucket_list() {
        let catalog = Catalog::from_list(" photos, ,logs ");
        assert!(catalog.contains("photos"));
        assert!(catalog.contains("logs"));
        assert_eq!(catalog.listing().buckets.len(), 2);
    }

    #[tokio::test]
    async fn test_should_list_catalog_buckets() {
        let resp = service("photos,logs")
            .handle(request(Method::GET, "/"))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("<Name>logs</Name>"));
        assert!(body.contains("<Name>photos</Name>"));
    }

    #[tokio::test]
    async fn test_should_answer_bucket_exists() {
        let svc = service("photos");
        assert_eq!(
            svc.handle(request(Method::HEAD, "/photos")).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            svc.handle(request(Method::HEAD, "/missing")).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_should_answer_not_implemented_by_default() {
        let resp = service("photos")
            .handle(request(Method::GET, "/photos/cat.jpg"))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
