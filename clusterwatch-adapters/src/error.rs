//! Error types for adapters.
//!
//! Per-request failures are reported as [`FetchResult`](clusterwatch_types::FetchResult)
//! values. These errors cover setup and orchestration failures only.

use thiserror::Error;

/// Errors that can occur outside of individual fetches.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// A spawned fetch task panicked or was cancelled.
    #[error("Fetch task failed: {0}")]
    Task(String),
}

#[cfg(feature = "couchbase")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::Client(err.to_string())
    }
}

#[cfg(feature = "couchbase")]
impl From<tokio::task::JoinError> for AdapterError {
    fn from(err: tokio::task::JoinError) -> Self {
        AdapterError::Task(err.to_string())
    }
}
