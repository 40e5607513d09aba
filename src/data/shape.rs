//! Projection of cluster aggregates into the dashboard view.
//!
//! Shaping is pure and total: every aggregate maps to exactly one
//! [`ShapedCluster`], missing payload fields fall back to defaults, and
//! byte counts are converted to GiB.

use serde_json::{json, Value};

use clusterwatch_types::{
    BucketAggregate, BucketStatsAggregate, ClusterAggregate, ClusterState, DiskTotals,
    MemoryTotals, ShapedBucket, ShapedBucketStats, ShapedCluster, ShapedNode,
};

use super::json::JsonExt;

const GIB: f64 = (1u64 << 30) as f64;
const UNKNOWN: &str = "Unknown";

/// Shape every aggregate, preserving order.
pub fn shape(aggregates: &[ClusterAggregate]) -> Vec<ShapedCluster> {
    aggregates.iter().map(shape_cluster).collect()
}

/// Shape a single aggregate.
pub fn shape_cluster(aggregate: &ClusterAggregate) -> ShapedCluster {
    match &aggregate.state {
        ClusterState::NotWatching => ShapedCluster {
            cluster_name: "Not Watching".to_string(),
            health: None,
            not_watching: true,
            ..placeholder(aggregate)
        },
        ClusterState::Failed { error } => ShapedCluster {
            cluster_name: "Error".to_string(),
            health: Some(false),
            error: Some(error.clone()),
            ..placeholder(aggregate)
        },
        ClusterState::Summarized {
            summary,
            buckets,
            bucket_stats,
        } => ShapedCluster {
            host: aggregate.host.clone(),
            custom_name: aggregate.custom_name.clone(),
            cluster_name: summary.str_at(&["clusterName"], UNKNOWN),
            cluster_uuid: cluster_uuid(summary),
            health: Some(is_healthy(summary)),
            memory: MemoryTotals {
                total: gib(summary, &["storageTotals", "ram", "total"]),
                used: gib(summary, &["storageTotals", "ram", "used"]),
                quota_total: gib(summary, &["storageTotals", "ram", "quotaTotal"]),
            },
            disk: DiskTotals {
                total: gib(summary, &["storageTotals", "hdd", "total"]),
                used: gib(summary, &["storageTotals", "hdd", "used"]),
                free: gib(summary, &["storageTotals", "hdd", "free"]),
            },
            nodes: nodes(summary).iter().map(shape_node).collect(),
            buckets: buckets.iter().map(shape_bucket).collect(),
            bucket_stats: bucket_stats.iter().map(shape_bucket_stats).collect(),
            system_stats: nodes(summary)
                .first()
                .map(|node| node.value_at(&["systemStats"], json!({})))
                .unwrap_or_else(|| json!({})),
            error: None,
            not_watching: false,
        },
    }
}

// Zeroed shape for clusters without a summary
fn placeholder(aggregate: &ClusterAggregate) -> ShapedCluster {
    ShapedCluster {
        host: aggregate.host.clone(),
        custom_name: aggregate.custom_name.clone(),
        cluster_name: UNKNOWN.to_string(),
        cluster_uuid: UNKNOWN.to_string(),
        health: None,
        memory: MemoryTotals::default(),
        disk: DiskTotals::default(),
        nodes: Vec::new(),
        buckets: Vec::new(),
        bucket_stats: Vec::new(),
        system_stats: json!({}),
        error: None,
        not_watching: false,
    }
}

fn nodes(summary: &Value) -> &[Value] {
    summary
        .at(&["nodes"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Healthy when every node reports `healthy`. No nodes counts as healthy.
fn is_healthy(summary: &Value) -> bool {
    nodes(summary)
        .iter()
        .all(|node| node.at(&["status"]).and_then(Value::as_str) == Some("healthy"))
}

/// The summary `uuid`, falling back to the `uuid=` parameter of `buckets.uri`.
fn cluster_uuid(summary: &Value) -> String {
    let uuid = summary.str_at(&["uuid"], UNKNOWN);
    if uuid != UNKNOWN {
        return uuid;
    }

    summary
        .at(&["buckets", "uri"])
        .and_then(Value::as_str)
        .and_then(uuid_from_uri)
        .unwrap_or(uuid)
}

fn uuid_from_uri(uri: &str) -> Option<String> {
    let (_, query) = uri.split_once('?').unwrap_or(("", uri));
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("uuid="))
        .filter(|uuid| !uuid.is_empty())
        .map(str::to_string)
}

fn gib(value: &Value, path: &[&str]) -> f64 {
    value.f64_at(path) / GIB
}

fn shape_node(node: &Value) -> ShapedNode {
    ShapedNode {
        hostname: node.str_at(&["hostname"], UNKNOWN),
        status: node.str_at(&["status"], UNKNOWN),
        services: node.value_at(&["services"], json!([])),
        cpu_utilization: node.value_at(&["systemStats", "cpu_utilization_rate"], json!(0)),
        memory_total: gib(node, &["memoryTotal"]),
        memory_free: gib(node, &["memoryFree"]),
    }
}

fn shape_bucket(bucket: &BucketAggregate) -> ShapedBucket {
    let empty = json!({});
    let data = bucket.data.as_ref().unwrap_or(&empty);

    ShapedBucket {
        name: bucket.bucket_name.clone(),
        uuid: data.str_at(&["uuid"], UNKNOWN),
        bucket_type: data.str_at(&["bucketType"], UNKNOWN),
        storage_backend: data.str_at(&["storageBackend"], UNKNOWN),
        replica_number: data.value_at(&["replicaNumber"], json!(0)),
        basic_stats: data.value_at(&["basicStats"], json!({})),
        quota: data.value_at(&["quota"], json!({})),
        eviction_policy: data.str_at(&["evictionPolicy"], UNKNOWN),
        durability_min_level: data.str_at(&["durabilityMinLevel"], UNKNOWN),
        quota_percent_used: data.value_at(&["basicStats", "quotaPercentUsed"], json!(0)),
        ops_per_sec: data.value_at(&["basicStats", "opsPerSec"], json!(0)),
        disk_fetches: data.value_at(&["basicStats", "diskFetches"], json!(0)),
        error: bucket.error.clone(),
    }
}

fn shape_bucket_stats(stats: &BucketStatsAggregate) -> ShapedBucketStats {
    ShapedBucketStats {
        name: stats.bucket_name.clone(),
        stats: stats.stats.clone(),
        error: stats.error.clone(),
    }
}
