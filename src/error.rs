//! Error types for the dashboard backend.

use std::path::PathBuf;

use clusterwatch_adapters::AdapterError;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("Failed to load config from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ::config::ConfigError,
    },

    /// A bare-array cluster file is not valid JSON for the cluster list.
    #[error("Failed to parse cluster list in {path}: {source}")]
    ClusterList {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A cluster host lacks an `http://` or `https://` scheme.
    #[error("Cluster host {0:?} must start with http:// or https://")]
    InvalidHost(String),
}

/// Errors surfaced while serving a dashboard request.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("No clusters configured")]
    NoClusters,

    #[error("Cluster not found")]
    ClusterNotFound,

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Errors that stop the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid listen address {0:?}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),
}
