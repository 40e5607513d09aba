//! UI-facing projections of cluster aggregates.
//!
//! Field names match what the dashboard script reads, which mixes camelCase
//! and snake_case keys.

use serde::Serialize;
use serde_json::Value;

/// Flattened, default-filled view of one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedCluster {
    pub host: String,
    pub custom_name: Option<String>,
    pub cluster_name: String,
    #[serde(rename = "clusterUUID")]
    pub cluster_uuid: String,
    /// `None` when the cluster is not watched.
    pub health: Option<bool>,
    pub memory: MemoryTotals,
    pub disk: DiskTotals,
    pub nodes: Vec<ShapedNode>,
    pub buckets: Vec<ShapedBucket>,
    #[serde(rename = "bucket_stats")]
    pub bucket_stats: Vec<ShapedBucketStats>,
    pub system_stats: Value,
    pub error: Option<String>,
    #[serde(rename = "not_watching")]
    pub not_watching: bool,
}

/// RAM totals in GiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryTotals {
    pub total: f64,
    pub used: f64,
    pub quota_total: f64,
}

/// Disk totals in GiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DiskTotals {
    pub total: f64,
    pub used: f64,
    pub free: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedNode {
    pub hostname: String,
    pub status: String,
    pub services: Value,
    pub cpu_utilization: Value,
    /// GiB
    pub memory_total: f64,
    /// GiB
    pub memory_free: f64,
}

/// One bucket row. Failed detail fetches keep the same shape with defaults
/// and a populated `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedBucket {
    pub name: String,
    pub uuid: String,
    pub bucket_type: String,
    pub storage_backend: String,
    pub replica_number: Value,
    pub basic_stats: Value,
    pub quota: Value,
    pub eviction_policy: String,
    pub durability_min_level: String,
    pub quota_percent_used: Value,
    pub ops_per_sec: Value,
    pub disk_fetches: Value,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedBucketStats {
    pub name: String,
    pub stats: Option<Value>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_wire_keys() {
        let cluster = ShapedCluster {
            host: "http://localhost:8091".to_string(),
            custom_name: None,
            cluster_name: "Not Watching".to_string(),
            cluster_uuid: "Unknown".to_string(),
            health: None,
            memory: MemoryTotals::default(),
            disk: DiskTotals::default(),
            nodes: Vec::new(),
            buckets: Vec::new(),
            bucket_stats: Vec::new(),
            system_stats: json!({}),
            error: None,
            not_watching: true,
        };

        let value = serde_json::to_value(&cluster).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "host",
            "customName",
            "clusterName",
            "clusterUUID",
            "health",
            "memory",
            "disk",
            "nodes",
            "buckets",
            "bucket_stats",
            "systemStats",
            "error",
            "not_watching",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(value["health"].is_null());
        assert_eq!(value["memory"]["quotaTotal"], 0.0);
    }
}
