//! Shaping of cluster aggregates for display.
//!
//! ## Submodules
//!
//! - [`json`]: Defaulted path lookups into loosely typed API payloads ([`JsonExt`])
//! - [`shape`]: Projection of [`ClusterAggregate`](clusterwatch_types::ClusterAggregate)s
//!   into [`ShapedCluster`](clusterwatch_types::ShapedCluster)s
//!
//! ## Data Flow
//!
//! ```text
//! ClusterAggregate (summary + bucket results)
//!        │
//!        ▼
//! shape()
//!        │
//!        ├──▶ health, UUID fallback, GiB totals
//!        │
//!        └──▶ ShapedBucket rows (defaults filled, errors carried)
//! ```

pub mod json;
pub mod shape;

pub use json::JsonExt;
pub use shape::{shape, shape_cluster};
