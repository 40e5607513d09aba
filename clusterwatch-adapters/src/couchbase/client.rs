//! HTTP client for the Couchbase management API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::error;

use clusterwatch_types::{ClusterConfig, FetchResult};

use crate::AdapterError;

/// Management API endpoints polled by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/pools/default`
    ClusterSummary,
    /// `/pools/default/buckets/{bucket}`
    BucketDetail(String),
    /// `/pools/default/buckets/{bucket}/stats`
    BucketStats(String),
    /// `/indexStatus`
    IndexStatus,
}

impl Endpoint {
    /// Request path, with bucket names encoded as a single segment.
    pub fn path(&self) -> String {
        match self {
            Endpoint::ClusterSummary => "/pools/default".to_string(),
            Endpoint::BucketDetail(bucket) => {
                format!("/pools/default/buckets/{}", urlencoded(bucket))
            }
            Endpoint::BucketStats(bucket) => {
                format!("/pools/default/buckets/{}/stats", urlencoded(bucket))
            }
            Endpoint::IndexStatus => "/indexStatus".to_string(),
        }
    }

    /// Full URL against a cluster host such as `http://10.0.0.1:8091`.
    pub fn url(&self, host: &str) -> String {
        format!("{}{}", host.trim_end_matches('/'), self.path())
    }
}

/// A source of management API responses.
///
/// Implementations must convert every failure into a [`FetchResult`]
/// variant; the aggregator relies on `fetch` never erroring.
#[async_trait]
pub trait ClusterApi: Send + Sync + 'static {
    async fn fetch(&self, cluster: &ClusterConfig, endpoint: &Endpoint) -> FetchResult<Value>;
}

/// Couchbase management API client.
///
/// Wraps one connection pool. Certificate validation is disabled for
/// `https://` hosts because clusters commonly serve self-signed certificates.
#[derive(Debug, Clone)]
pub struct CouchbaseClient {
    client: Client,
}

impl CouchbaseClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CouchbaseClientBuilder {
        CouchbaseClientBuilder::default()
    }

    /// Authenticated GET of a JSON document.
    ///
    /// 200 yields the parsed body. Any other status yields
    /// [`FetchResult::HttpError`]; connection, timeout and decoding failures
    /// yield [`FetchResult::TransportError`] with the underlying description.
    pub async fn get(&self, url: &str, user: &str, password: &str) -> FetchResult<Value> {
        let response = match self
            .client
            .get(url)
            .basic_auth(user, Some(password))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(url, error = %e, "request failed");
                return FetchResult::transport(e.to_string());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!(url, status = status.as_u16(), "unexpected status");
            return FetchResult::http_error(status.as_u16());
        }

        match response.json::<Value>().await {
            Ok(payload) => FetchResult::Success(payload),
            Err(e) => {
                error!(url, error = %e, "failed to decode response body");
                FetchResult::transport(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ClusterApi for CouchbaseClient {
    async fn fetch(&self, cluster: &ClusterConfig, endpoint: &Endpoint) -> FetchResult<Value> {
        self.get(&endpoint.url(&cluster.host), &cluster.user, &cluster.password)
            .await
    }
}

/// Builder for CouchbaseClient.
#[derive(Debug, Default)]
pub struct CouchbaseClientBuilder {
    timeout: Option<Duration>,
    accept_invalid_certs: Option<bool>,
}

impl CouchbaseClientBuilder {
    /// Set the per-request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept self-signed or otherwise invalid certificates (default: true).
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = Some(accept);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CouchbaseClient, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs.unwrap_or(true))
            .build()?;

        Ok(CouchbaseClient { client })
    }
}

// Percent-encode a string for use as one path segment
fn urlencoded(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
