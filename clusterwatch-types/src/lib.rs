//! # clusterwatch-types
//!
//! Core types shared by the clusterwatch crates. They describe the three
//! stages a poll cycle moves through:
//!
//! ```text
//! ClusterConfig ──▶ FetchResult<Value> ──▶ ClusterAggregate ──▶ ShapedCluster
//!  (configured)      (one HTTP call)        (one cluster)        (UI-ready)
//! ```
//!
//! - [`ClusterConfig`]: one monitored cluster as it appears in configuration
//! - [`FetchResult`]: the outcome of a single management API call. Failures
//!   are data, never errors
//! - [`ClusterAggregate`]: everything collected for one cluster in one pass
//! - [`ShapedCluster`]: the flattened, default-filled projection served to
//!   the dashboard
//!
//! ## Example
//!
//! ```rust
//! use clusterwatch_types::{ClusterAggregate, ClusterConfig, FetchResult};
//!
//! let config: ClusterConfig = serde_json::from_str(
//!     r#"{"host": "http://10.0.0.1:8091", "user": "admin", "pass": "secret"}"#,
//! ).unwrap();
//! assert!(config.watch);
//!
//! let result: FetchResult<serde_json::Value> = FetchResult::http_error(401);
//! let aggregate = ClusterAggregate::from_summary(&config, result);
//! assert_eq!(aggregate.error(), Some("Failed with status 401"));
//! ```

mod aggregate;
mod config;
mod fetch;
mod shaped;

pub use aggregate::*;
pub use config::*;
pub use fetch::*;
pub use shaped::*;
