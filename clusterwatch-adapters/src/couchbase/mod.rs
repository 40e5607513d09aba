//! Couchbase adapter using the cluster management REST API.
//!
//! The management API is typically available on port 8091 (`http://`) or
//! 18091 (`https://`).
//!
//! ## Data Collected
//!
//! - **Cluster summary** (`/pools/default`): nodes, storage totals, bucket listing
//! - **Bucket detail** (`/pools/default/buckets/{name}`): type, quota, basic stats
//! - **Bucket stats** (`/pools/default/buckets/{name}/stats`): sampled op counters
//! - **Index status** (`/indexStatus`): GSI index state
//!
//! ## Example
//!
//! ```rust,no_run
//! use clusterwatch_adapters::couchbase::{Aggregator, Timeouts};
//! use clusterwatch_adapters::ClusterConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::connect(Timeouts::default())?;
//!     let cluster = ClusterConfig::new("https://cb.internal:18091", "admin", "secret");
//!
//!     for aggregate in aggregator.aggregate(&[cluster]).await {
//!         match aggregate.summary() {
//!             Some(summary) => println!("{}: {}", aggregate.host, summary["clusterName"]),
//!             None => println!("{}: {:?}", aggregate.host, aggregate.error()),
//!         }
//!         for bucket in aggregate.buckets() {
//!             println!("  bucket {}", bucket.bucket_name);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod aggregate;
mod client;

#[cfg(test)]
mod fixture;

pub use aggregate::{fetch_cluster_with_timeout, fetch_with_timeout, Aggregator, Timeouts};
pub use client::{ClusterApi, CouchbaseClient, CouchbaseClientBuilder, Endpoint};
