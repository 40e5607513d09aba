//! Request routing.
//!
//! | Route                                          | Response                       |
//! |------------------------------------------------|--------------------------------|
//! | `GET /`                                        | dashboard page                 |
//! | `GET /api/clusters`                            | `[ShapedCluster]`              |
//! | `GET /api/bucket/{clusterHost}/{bucket}/stats` | `{"stats": .., "bucket": ..}`  |
//! | `GET /api/indexStatus`                         | `[IndexStatusEntry]`           |
//! | `GET /health`                                  | `OK`                           |

use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::context::AppContext;
use crate::error::DashboardError;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// A fully rendered response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl Reply {
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body: Bytes::from(body),
            },
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    }

    fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Bytes::from(json!({ "error": message }).to_string()),
        }
    }

    fn text(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        Self {
            status,
            content_type,
            body: Bytes::from_static(body.as_bytes()),
        }
    }
}

/// Dispatch one request.
pub async fn route(ctx: &AppContext, method: &Method, path: &str) -> Reply {
    if *method != Method::GET {
        return Reply::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        [""] => Reply::text(StatusCode::OK, "text/html; charset=utf-8", INDEX_HTML),
        ["health"] => Reply::text(StatusCode::OK, "text/plain", "OK"),
        ["api", "clusters"] => clusters(ctx).await,
        ["api", "indexStatus"] => index_status(ctx).await,
        ["api", "bucket", host, bucket, "stats"] => {
            bucket_stats(ctx, &percent_decode(host), &percent_decode(bucket)).await
        }
        _ => Reply::error(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn clusters(ctx: &AppContext) -> Reply {
    match ctx.dashboard().await {
        Ok(clusters) => Reply::json(StatusCode::OK, &clusters),
        Err(e) => failure(e),
    }
}

async fn index_status(ctx: &AppContext) -> Reply {
    match ctx.index_status().await {
        Ok(entries) => Reply::json(StatusCode::OK, &entries),
        Err(e) => failure(e),
    }
}

async fn bucket_stats(ctx: &AppContext, cluster_host: &str, bucket: &str) -> Reply {
    match ctx.bucket_report(cluster_host, bucket).await {
        Ok(report) => Reply::json(StatusCode::OK, &report),
        Err(e) => failure(e),
    }
}

fn failure(e: DashboardError) -> Reply {
    let status = match &e {
        DashboardError::ClusterNotFound => StatusCode::NOT_FOUND,
        DashboardError::NoClusters => StatusCode::INTERNAL_SERVER_ERROR,
        DashboardError::Adapter(_) => {
            error!(error = %e, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    Reply::error(status, &e.to_string())
}

// Segments that do not decode to UTF-8 are used as sent
fn percent_decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterwatch_adapters::couchbase::Timeouts;
    use clusterwatch_types::ClusterConfig;
    use serde_json::Value;

    use crate::context::ClusterSource;

    fn context(clusters: Vec<ClusterConfig>) -> AppContext {
        AppContext::new(ClusterSource::Fixed(clusters), Timeouts::default())
    }

    fn body_json(reply: &Reply) -> Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[tokio::test]
    async fn test_clusters_without_configuration() {
        let reply = route(&context(Vec::new()), &Method::GET, "/api/clusters").await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&reply), json!({"error": "No clusters configured"}));
    }

    #[tokio::test]
    async fn test_clusters_not_watching() {
        let ctx = context(vec![
            ClusterConfig::new("http://a:8091", "u", "p").with_custom_name("A").with_watch(false)
        ]);

        let reply = route(&ctx, &Method::GET, "/api/clusters").await;

        assert_eq!(reply.status, StatusCode::OK);
        let body = body_json(&reply);
        assert_eq!(body[0]["clusterName"], "Not Watching");
        assert_eq!(body[0]["customName"], "A");
        assert!(body[0]["health"].is_null());
        assert_eq!(body[0]["not_watching"], true);
    }

    #[tokio::test]
    async fn test_bucket_stats_unknown_cluster() {
        let ctx = context(vec![ClusterConfig::new("http://a:8091", "u", "p")]);

        let reply = route(&ctx, &Method::GET, "/api/bucket/nope/travel-sample/stats").await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(body_json(&reply), json!({"error": "Cluster not found"}));
    }

    #[tokio::test]
    async fn test_bucket_stats_host_with_port_never_matches() {
        // The port is appended to the path segment, giving http://nope:8091:8091
        let ctx = context(vec![ClusterConfig::new("http://nope:8091", "u", "p")]);

        let reply = route(&ctx, &Method::GET, "/api/bucket/nope:8091/any/stats").await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(body_json(&reply), json!({"error": "Cluster not found"}));
    }

    #[tokio::test]
    async fn test_index_status_skips_unwatched() {
        let ctx = context(vec![
            ClusterConfig::new("http://a:8091", "u", "p").with_watch(false)
        ]);

        let reply = route(&ctx, &Method::GET, "/api/indexStatus").await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(body_json(&reply), json!([]));
    }

    #[tokio::test]
    async fn test_static_routes() {
        let ctx = context(Vec::new());

        let health = route(&ctx, &Method::GET, "/health").await;
        assert_eq!(health.status, StatusCode::OK);
        assert_eq!(health.body, Bytes::from_static(b"OK"));

        let index = route(&ctx, &Method::GET, "/").await;
        assert_eq!(index.status, StatusCode::OK);
        assert!(index.content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let ctx = context(Vec::new());

        let missing = route(&ctx, &Method::GET, "/api/unknown").await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(body_json(&missing), json!({"error": "Not found"}));

        let post = route(&ctx, &Method::POST, "/api/clusters").await;
        assert_eq!(post.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("travel-sample"), "travel-sample");
        assert_eq!(percent_decode("my%20bucket"), "my bucket");
        assert_eq!(percent_decode("a%2Fb"), "a/b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%FF"), "%FF");
    }
}
