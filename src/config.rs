//! Settings loading.
//!
//! Settings come from one file (JSON, TOML or YAML, picked by extension)
//! layered with `CLUSTERWATCH_*` environment variables, e.g.
//! `CLUSTERWATCH_SERVER__LISTEN_ADDR=0.0.0.0:5000`.
//!
//! ```json
//! {
//!   "clusters": [
//!     {"host": "http://10.0.0.1:8091", "user": "admin", "pass": "secret", "customName": "prod"}
//!   ],
//!   "logging": {"level": "info"},
//!   "server": {"listen_addr": "127.0.0.1:5000"},
//!   "timeouts": {"cluster_secs": 15, "bucket_group_secs": 10, "request_secs": 10}
//! }
//! ```
//!
//! A JSON file whose root is a bare array is read as the cluster list, with
//! every other section at its default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use clusterwatch_adapters::couchbase::Timeouts;
use clusterwatch_types::ClusterConfig;
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;

/// Everything read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clusters: Vec<ClusterConfig>,
    pub logging: LoggingSettings,
    pub server: ServerSettings,
    pub timeouts: TimeoutSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Colored output.
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Deadlines in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub cluster_secs: u64,
    pub bucket_group_secs: u64,
    pub request_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        let defaults = Timeouts::default();
        Self {
            cluster_secs: defaults.cluster.as_secs(),
            bucket_group_secs: defaults.bucket_group.as_secs(),
            request_secs: defaults.request.as_secs(),
        }
    }
}

impl From<TimeoutSettings> for Timeouts {
    fn from(settings: TimeoutSettings) -> Self {
        Timeouts {
            cluster: Duration::from_secs(settings.cluster_secs),
            bucket_group: Duration::from_secs(settings.bucket_group_secs),
            request: Duration::from_secs(settings.request_secs),
        }
    }
}

impl Settings {
    /// Load and validate settings from `path` plus the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = match read_bare_cluster_list(path)? {
            Some(clusters) => Settings {
                clusters,
                ..Settings::default()
            },
            None => Config::builder()
                .add_source(File::from(path))
                .add_source(
                    Environment::with_prefix("CLUSTERWATCH")
                        .prefix_separator("_")
                        .separator("__"),
                )
                .build()
                .and_then(|config| config.try_deserialize::<Settings>())
                .map_err(|source| ConfigError::Load {
                    path: path.to_path_buf(),
                    source,
                })?,
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.clusters.iter().find(|c| !c.has_http_scheme()) {
            Some(cluster) => Err(ConfigError::InvalidHost(cluster.host.clone())),
            None => Ok(()),
        }
    }
}

// `Ok(None)` means the file is not a bare JSON array and should go through
// the layered loader.
fn read_bare_cluster_list(path: &Path) -> Result<Option<Vec<ClusterConfig>>, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Ok(None);
    }

    // Unreadable files are reported by the layered loader
    let Ok(text) = fs::read_to_string(path) else {
        return Ok(None);
    };
    if !text.trim_start().starts_with('[') {
        return Ok(None);
    }

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::ClusterList {
            path: path.to_path_buf(),
            source,
        })
}
