//! Concurrent fan-out across clusters and their buckets.
//!
//! A pass runs in two phases:
//!
//! ```text
//! configs ──▶ summary fetch per watched cluster (concurrent, individual deadline)
//!                 │
//!                 ▼
//!             bucket phase per summarized cluster (concurrent across clusters)
//!                 └─▶ detail + stats per bucket (concurrent, one shared deadline)
//! ```
//!
//! Every spawned task lives in a [`JoinSet`] owned by the call, so nothing
//! outlives the pass. Results are placed by input position, never by
//! completion order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use clusterwatch_types::{
    BucketAggregate, BucketReport, BucketStatsAggregate, ClusterAggregate, ClusterConfig,
    FetchResult, IndexStatusEntry,
};

use super::client::{ClusterApi, CouchbaseClient, Endpoint};
use crate::AdapterError;

/// Deadlines applied during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Individual deadline for each cluster-level call (default: 15 seconds).
    pub cluster: Duration,
    /// Shared deadline for all bucket calls of one cluster (default: 10 seconds).
    pub bucket_group: Duration,
    /// Per-request timeout of the HTTP client (default: 10 seconds).
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            cluster: Duration::from_secs(15),
            bucket_group: Duration::from_secs(10),
            request: Duration::from_secs(10),
        }
    }
}

/// Fetch one endpoint, converting an elapsed deadline into [`FetchResult::Timeout`].
///
/// The inner call is dropped when the deadline fires; a late response is
/// discarded.
pub async fn fetch_with_timeout<A: ClusterApi + ?Sized>(
    api: &A,
    cluster: &ClusterConfig,
    endpoint: &Endpoint,
    timeout: Duration,
) -> FetchResult<Value> {
    match tokio::time::timeout(timeout, api.fetch(cluster, endpoint)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(host = %cluster.host, path = %endpoint.path(), ?timeout, "request timed out");
            FetchResult::timeout(timeout)
        }
    }
}

/// Fetch `/pools/default` for a cluster with an individual deadline.
pub async fn fetch_cluster_with_timeout<A: ClusterApi + ?Sized>(
    api: &A,
    cluster: &ClusterConfig,
    timeout: Duration,
) -> FetchResult<Value> {
    fetch_with_timeout(api, cluster, &Endpoint::ClusterSummary, timeout).await
}

/// Collects cluster health across many clusters in one pass.
#[derive(Debug)]
pub struct Aggregator<A = CouchbaseClient> {
    api: Arc<A>,
    timeouts: Timeouts,
}

impl Aggregator<CouchbaseClient> {
    /// Create an aggregator backed by a fresh HTTP connection pool.
    ///
    /// Build one per pass; the pool is shared only by that pass's tasks.
    pub fn connect(timeouts: Timeouts) -> Result<Self, AdapterError> {
        let client = CouchbaseClient::builder()
            .timeout(timeouts.request)
            .build()?;
        Ok(Self::new(client, timeouts))
    }
}

impl<A: ClusterApi> Aggregator<A> {
    pub fn new(api: A, timeouts: Timeouts) -> Self {
        Self {
            api: Arc::new(api),
            timeouts,
        }
    }

    /// Aggregate every configured cluster, in configuration order.
    ///
    /// Unwatched clusters are never contacted. A failing or slow cluster
    /// only affects its own entry. Bucket calls that miss the shared
    /// deadline or die are left out of their lists; bucket calls that
    /// complete with an HTTP or transport failure are kept as error rows.
    pub async fn aggregate(&self, configs: &[ClusterConfig]) -> Vec<ClusterAggregate> {
        let summaries = self
            .fan_out(configs, &Endpoint::ClusterSummary, self.timeouts.cluster)
            .await;

        let mut aggregates: Vec<ClusterAggregate> = configs
            .iter()
            .zip(summaries)
            .map(|(config, summary)| match summary {
                _ if !config.watch => {
                    debug!(host = %config.host, "cluster not watched, skipping");
                    ClusterAggregate::not_watching(config)
                }
                Some(result) => ClusterAggregate::from_summary(config, result),
                None => ClusterAggregate::failed(config, "Summary fetch did not complete"),
            })
            .collect();

        let mut bucket_phases = JoinSet::new();
        let mut positions = HashMap::new();

        for (index, aggregate) in aggregates.iter().enumerate() {
            let Some(summary) = aggregate.summary() else {
                continue;
            };
            let names = bucket_names(summary);
            if names.is_empty() {
                continue;
            }

            let handle = bucket_phases.spawn(fetch_buckets(
                Arc::clone(&self.api),
                configs[index].clone(),
                names,
                self.timeouts.bucket_group,
            ));
            positions.insert(handle.id(), index);
        }

        while let Some(joined) = bucket_phases.join_next_with_id().await {
            match joined {
                Ok((id, (details, stats))) => {
                    if let Some(&index) = positions.get(&id) {
                        aggregates[index].set_buckets(details, stats);
                    }
                }
                Err(err) => {
                    let host = positions
                        .get(&err.id())
                        .map(|&index| configs[index].host.as_str())
                        .unwrap_or("unknown");
                    error!(host, error = %err, "error fetching bucket data");
                }
            }
        }

        aggregates
    }

    /// Fetch `/indexStatus` for every watched cluster, in configuration order.
    pub async fn index_status(&self, configs: &[ClusterConfig]) -> Vec<IndexStatusEntry> {
        let results = self
            .fan_out(configs, &Endpoint::IndexStatus, self.timeouts.cluster)
            .await;

        configs
            .iter()
            .zip(results)
            .filter(|(config, _)| config.watch)
            .filter_map(|(config, result)| {
                result.map(|result| IndexStatusEntry::from_fetch(config, result))
            })
            .collect()
    }

    /// Fetch stats and detail for one bucket of one cluster.
    pub async fn bucket_report(
        &self,
        cluster: &ClusterConfig,
        bucket: &str,
    ) -> Result<BucketReport, AdapterError> {
        let cluster = Arc::new(cluster.clone());
        let mut calls = JoinSet::new();

        for call in [BucketCall::Stats, BucketCall::Detail] {
            let api = Arc::clone(&self.api);
            let cluster = Arc::clone(&cluster);
            let endpoint = call.endpoint(bucket);
            let timeout = self.timeouts.cluster;
            calls.spawn(async move {
                (
                    call,
                    fetch_with_timeout(api.as_ref(), &cluster, &endpoint, timeout).await,
                )
            });
        }

        let mut stats = None;
        let mut detail = None;
        while let Some(joined) = calls.join_next().await {
            match joined? {
                (BucketCall::Stats, result) => stats = Some(result),
                (BucketCall::Detail, result) => detail = Some(result),
            }
        }

        match (stats, detail) {
            (Some(stats), Some(detail)) => Ok(BucketReport {
                stats: BucketStatsAggregate::from_fetch(bucket, stats),
                bucket: BucketAggregate::from_fetch(bucket, detail),
            }),
            _ => Err(AdapterError::Task(format!(
                "bucket {} fetch did not complete",
                bucket
            ))),
        }
    }

    /// Fetch one endpoint from every watched cluster concurrently.
    ///
    /// The returned slots line up with `configs`; unwatched clusters get
    /// `None`. A task that dies is reported as a failed fetch in its slot.
    async fn fan_out(
        &self,
        configs: &[ClusterConfig],
        endpoint: &Endpoint,
        timeout: Duration,
    ) -> Vec<Option<FetchResult<Value>>> {
        let mut slots: Vec<Option<FetchResult<Value>>> = vec![None; configs.len()];
        let mut tasks = JoinSet::new();
        let mut positions = HashMap::new();

        for (index, config) in configs.iter().enumerate() {
            if !config.watch {
                continue;
            }
            let api = Arc::clone(&self.api);
            let config = config.clone();
            let endpoint = endpoint.clone();
            let handle = tasks.spawn(async move {
                fetch_with_timeout(api.as_ref(), &config, &endpoint, timeout).await
            });
            positions.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(err) => {
                    let host = positions
                        .get(&err.id())
                        .map(|&index| configs[index].host.as_str())
                        .unwrap_or("unknown");
                    error!(host, path = %endpoint.path(), error = %err, "fetch task failed");
                    let message = format!("Timeout or error: {}", err);
                    (err.id(), FetchResult::transport(message))
                }
            };
            if let Some(&index) = positions.get(&id) {
                slots[index] = Some(result);
            }
        }

        slots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketCall {
    Detail,
    Stats,
}

impl BucketCall {
    fn endpoint(self, bucket: &str) -> Endpoint {
        match self {
            BucketCall::Detail => Endpoint::BucketDetail(bucket.to_string()),
            BucketCall::Stats => Endpoint::BucketStats(bucket.to_string()),
        }
    }
}

/// Detail and stats for every bucket of one cluster under a shared deadline.
///
/// Slots are indexed by the bucket's position in the summary listing; a call
/// that misses the deadline or dies leaves its slot empty and is dropped.
async fn fetch_buckets<A: ClusterApi>(
    api: Arc<A>,
    cluster: ClusterConfig,
    names: Vec<String>,
    group_timeout: Duration,
) -> (Vec<BucketAggregate>, Vec<BucketStatsAggregate>) {
    let deadline = Instant::now() + group_timeout;
    let cluster = Arc::new(cluster);

    let mut details: Vec<Option<BucketAggregate>> = vec![None; names.len()];
    let mut stats: Vec<Option<BucketStatsAggregate>> = vec![None; names.len()];
    let mut calls = JoinSet::new();

    for (index, name) in names.iter().enumerate() {
        for call in [BucketCall::Detail, BucketCall::Stats] {
            let api = Arc::clone(&api);
            let cluster = Arc::clone(&cluster);
            let endpoint = call.endpoint(name);
            calls.spawn(async move {
                let result =
                    tokio::time::timeout_at(deadline, api.fetch(&cluster, &endpoint)).await;
                (index, call, result)
            });
        }
    }

    while let Some(joined) = calls.join_next().await {
        match joined {
            Ok((index, BucketCall::Detail, Ok(result))) => {
                details[index] = Some(BucketAggregate::from_fetch(&names[index], result));
            }
            Ok((index, BucketCall::Stats, Ok(result))) => {
                stats[index] = Some(BucketStatsAggregate::from_fetch(&names[index], result));
            }
            Ok((index, call, Err(_))) => {
                warn!(
                    host = %cluster.host,
                    bucket = %names[index],
                    ?call,
                    "bucket data fetch timeout"
                );
            }
            Err(err) => {
                error!(host = %cluster.host, error = %err, "bucket fetch task failed");
            }
        }
    }

    (
        details.into_iter().flatten().collect(),
        stats.into_iter().flatten().collect(),
    )
}

/// Bucket names from the summary's `bucketNames` listing, in listing order.
fn bucket_names(summary: &Value) -> Vec<String> {
    summary
        .get("bucketNames")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("bucketName").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
