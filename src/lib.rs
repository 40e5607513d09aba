//! # clusterwatch
//!
//! A dashboard backend that polls Couchbase cluster management APIs and
//! serves aggregated health as JSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          server                              │
//! │   GET /api/clusters ──▶ AppContext::dashboard()              │
//! │                              │                               │
//! │          ┌───────────────────┼────────────────────┐          │
//! │          ▼                   ▼                    ▼          │
//! │   ┌────────────┐     ┌──────────────┐      ┌───────────┐     │
//! │   │   config   │     │  Aggregator  │─────▶│   data    │     │
//! │   │ (clusters) │     │  (fan-out)   │      │  (shape)  │     │
//! │   └────────────┘     └──────┬───────┘      └───────────┘     │
//! │                             ▼                                │
//! │                      CouchbaseClient ──▶ /pools/default ...  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: Layered settings ([`Settings`]), re-read per request for
//!   the cluster list
//! - **[`context`]**: Shared request state ([`AppContext`])
//! - **[`data`]**: Pure projection of aggregates into UI-ready clusters
//! - **[`server`]**: hyper HTTP/1 server and routing
//!
//! The fetch client and aggregator live in `clusterwatch-adapters`; the
//! shared data types live in `clusterwatch-types`.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Serve the dashboard
//! clusterwatch --config config.json --listen 0.0.0.0:5000
//!
//! # One aggregation pass printed as JSON
//! clusterwatch --config config.json --once
//! ```
//!
//! ### As a library
//!
//! ```
//! use clusterwatch::data::shape;
//! use clusterwatch_types::{ClusterAggregate, ClusterConfig};
//!
//! let config = ClusterConfig::new("http://10.0.0.1:8091", "admin", "secret").with_watch(false);
//! let shaped = shape(&[ClusterAggregate::not_watching(&config)]);
//!
//! assert_eq!(shaped[0].cluster_name, "Not Watching");
//! assert!(shaped[0].health.is_none());
//! ```

pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod server;

pub use config::{LoggingSettings, ServerSettings, Settings, TimeoutSettings};
pub use context::{AppContext, ClusterSource};
pub use error::{ConfigError, DashboardError, ServerError};
