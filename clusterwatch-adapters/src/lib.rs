//! # clusterwatch-adapters
//!
//! Adapters that fetch health data from cluster management APIs and fold it
//! into [`ClusterAggregate`]s.
//!
//! ## Supported Systems
//!
//! - **Couchbase** (`couchbase` feature, default) - Cluster summary, bucket
//!   detail, bucket stats and index status via the management REST API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clusterwatch_adapters::couchbase::{Aggregator, Timeouts};
//! use clusterwatch_adapters::ClusterConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::connect(Timeouts::default())?;
//!
//!     let clusters = vec![ClusterConfig::new("http://localhost:8091", "admin", "password")];
//!     let aggregates = aggregator.aggregate(&clusters).await;
//!
//!     println!("Collected {} clusters", aggregates.len());
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "couchbase")]
pub mod couchbase;

pub use error::AdapterError;

// Re-export types for convenience
pub use clusterwatch_types::{
    BucketAggregate, BucketReport, BucketStatsAggregate, ClusterAggregate, ClusterConfig,
    ClusterState, FetchResult, IndexStatusEntry,
};
