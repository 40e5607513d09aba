//! Per-cluster aggregates built during one poll cycle.

use serde::Serialize;
use serde_json::Value;

use crate::{ClusterConfig, FetchResult};

/// Everything collected for one cluster during a poll cycle.
///
/// Built once by the aggregator and never mutated by consumers. The state
/// enum guarantees that exactly one of "summary", "error" or "not watching"
/// holds, and that bucket lists only exist alongside a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAggregate {
    pub host: String,
    pub custom_name: Option<String>,
    pub state: ClusterState,
}

/// What the poll cycle produced for a cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterState {
    /// Configured with `watch = false`; no request was made.
    NotWatching,
    /// The summary fetch failed or the fetch task died.
    Failed { error: String },
    /// The summary fetch succeeded. Bucket lists follow the order of the
    /// summary's bucket listing and may be partial.
    Summarized {
        summary: Value,
        buckets: Vec<BucketAggregate>,
        bucket_stats: Vec<BucketStatsAggregate>,
    },
}

impl ClusterAggregate {
    /// Placeholder for an unwatched cluster.
    pub fn not_watching(config: &ClusterConfig) -> Self {
        Self::with_state(config, ClusterState::NotWatching)
    }

    /// Error-shaped aggregate.
    pub fn failed(config: &ClusterConfig, error: impl Into<String>) -> Self {
        Self::with_state(
            config,
            ClusterState::Failed {
                error: error.into(),
            },
        )
    }

    /// Aggregate for a successful summary, before any bucket data arrives.
    pub fn summarized(config: &ClusterConfig, summary: Value) -> Self {
        Self::with_state(
            config,
            ClusterState::Summarized {
                summary,
                buckets: Vec::new(),
                bucket_stats: Vec::new(),
            },
        )
    }

    /// Build from the outcome of a summary fetch.
    pub fn from_summary(config: &ClusterConfig, result: FetchResult<Value>) -> Self {
        match result.into_parts() {
            (Some(summary), _) => Self::summarized(config, summary),
            (None, error) => Self::failed(config, error.unwrap_or_default()),
        }
    }

    fn with_state(config: &ClusterConfig, state: ClusterState) -> Self {
        Self {
            host: config.host.clone(),
            custom_name: config.custom_name.clone(),
            state,
        }
    }

    /// Attach bucket results. Has no effect unless the aggregate holds a summary.
    pub fn set_buckets(
        &mut self,
        details: Vec<BucketAggregate>,
        stats: Vec<BucketStatsAggregate>,
    ) {
        if let ClusterState::Summarized {
            buckets,
            bucket_stats,
            ..
        } = &mut self.state
        {
            *buckets = details;
            *bucket_stats = stats;
        }
    }

    pub fn is_not_watching(&self) -> bool {
        matches!(self.state, ClusterState::NotWatching)
    }

    pub fn summary(&self) -> Option<&Value> {
        match &self.state {
            ClusterState::Summarized { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ClusterState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn buckets(&self) -> &[BucketAggregate] {
        match &self.state {
            ClusterState::Summarized { buckets, .. } => buckets,
            _ => &[],
        }
    }

    pub fn bucket_stats(&self) -> &[BucketStatsAggregate] {
        match &self.state {
            ClusterState::Summarized { bucket_stats, .. } => bucket_stats,
            _ => &[],
        }
    }
}

/// Outcome of a bucket detail fetch (`/pools/default/buckets/{name}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAggregate {
    pub bucket_name: String,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl BucketAggregate {
    pub fn from_fetch(bucket_name: impl Into<String>, result: FetchResult<Value>) -> Self {
        let (data, error) = result.into_parts();
        Self {
            bucket_name: bucket_name.into(),
            data,
            error,
        }
    }
}

/// Outcome of a bucket stats fetch (`/pools/default/buckets/{name}/stats`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStatsAggregate {
    pub bucket_name: String,
    pub stats: Option<Value>,
    pub error: Option<String>,
}

impl BucketStatsAggregate {
    pub fn from_fetch(bucket_name: impl Into<String>, result: FetchResult<Value>) -> Self {
        let (stats, error) = result.into_parts();
        Self {
            bucket_name: bucket_name.into(),
            stats,
            error,
        }
    }
}

/// Detail and stats for a single bucket, fetched on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketReport {
    pub stats: BucketStatsAggregate,
    pub bucket: BucketAggregate,
}

/// Index status of one watched cluster (`/indexStatus`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatusEntry {
    pub host: String,
    #[serde(rename = "customName")]
    pub custom_name: Option<String>,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl IndexStatusEntry {
    pub fn from_fetch(config: &ClusterConfig, result: FetchResult<Value>) -> Self {
        let (data, error) = result.into_parts();
        Self {
            host: config.host.clone(),
            custom_name: config.custom_name.clone(),
            data,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ClusterConfig {
        ClusterConfig::new("http://localhost:8091", "admin", "password").with_custom_name("Test")
    }

    #[test]
    fn test_not_watching_has_no_summary_or_error() {
        let aggregate = ClusterAggregate::not_watching(&config());
        assert!(aggregate.is_not_watching());
        assert!(aggregate.summary().is_none());
        assert!(aggregate.error().is_none());
        assert!(aggregate.buckets().is_empty());
        assert_eq!(aggregate.custom_name.as_deref(), Some("Test"));
    }

    #[test]
    fn test_from_summary_failure_carries_message() {
        let aggregate = ClusterAggregate::from_summary(
            &config(),
            FetchResult::timeout(std::time::Duration::from_secs(15)),
        );
        assert_eq!(aggregate.error(), Some("Request timeout after 15 seconds"));
        assert!(aggregate.summary().is_none());
    }

    #[test]
    fn test_set_buckets_ignored_without_summary() {
        let mut aggregate = ClusterAggregate::failed(&config(), "boom");
        aggregate.set_buckets(
            vec![BucketAggregate::from_fetch("b1", FetchResult::Success(json!({})))],
            Vec::new(),
        );
        assert!(aggregate.buckets().is_empty());
    }

    #[test]
    fn test_set_buckets_on_summary() {
        let mut aggregate = ClusterAggregate::summarized(&config(), json!({"clusterName": "c"}));
        aggregate.set_buckets(
            vec![BucketAggregate::from_fetch("b1", FetchResult::Success(json!({})))],
            vec![BucketStatsAggregate::from_fetch("b1", FetchResult::http_error(404))],
        );
        assert_eq!(aggregate.buckets().len(), 1);
        assert_eq!(
            aggregate.bucket_stats()[0].error.as_deref(),
            Some("Failed with status 404")
        );
    }

    #[test]
    fn test_bucket_report_wire_shape() {
        let report = BucketReport {
            stats: BucketStatsAggregate::from_fetch(
                "travel",
                FetchResult::Success(json!({"op": {}})),
            ),
            bucket: BucketAggregate::from_fetch("travel", FetchResult::transport("refused")),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "stats": {"bucket_name": "travel", "stats": {"op": {}}, "error": null},
                "bucket": {"bucket_name": "travel", "data": null, "error": "refused"}
            })
        );
    }

    #[test]
    fn test_index_status_entry_keys() {
        let entry = IndexStatusEntry::from_fetch(&config(), FetchResult::Success(json!([])));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["customName"], "Test");
        assert_eq!(value["host"], "http://localhost:8091");
        assert!(value["error"].is_null());
    }
}
