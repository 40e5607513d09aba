//! Cluster configuration entries.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One monitored cluster as declared in configuration.
///
/// Field names follow the configuration file (`pass`, `customName`).
/// `watch` defaults to `true` when absent; unwatched clusters are shown as
/// placeholders and never polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Base URL of the management API, e.g. `http://10.0.0.1:8091`.
    pub host: String,
    pub user: String,
    #[serde(rename = "pass")]
    pub password: String,
    // config-rs may hand keys over lowercased
    #[serde(
        rename = "customName",
        alias = "customname",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_name: Option<String>,
    #[serde(default = "default_watch", deserialize_with = "strict_bool")]
    pub watch: bool,
}

fn default_watch() -> bool {
    true
}

// Self-describing formats otherwise let config-rs coerce "yes" or 0 into a bool
fn strict_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(value) => Ok(value),
        other => Err(D::Error::custom(format!(
            "invalid type for `watch`: expected a boolean, found {}",
            other
        ))),
    }
}

impl ClusterConfig {
    /// Create a watched cluster entry.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            custom_name: None,
            watch: true,
        }
    }

    /// Set the display name.
    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    /// Set the watch flag.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Whether the host uses an `http://` or `https://` scheme.
    pub fn has_http_scheme(&self) -> bool {
        self.host.starts_with("http://") || self.host.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_defaults_to_true() {
        let config: ClusterConfig = serde_json::from_str(
            r#"{"host": "http://localhost:8091", "user": "admin", "pass": "password"}"#,
        )
        .unwrap();

        assert!(config.watch);
        assert_eq!(config.password, "password");
        assert!(config.custom_name.is_none());
    }

    #[test]
    fn test_explicit_watch_false() {
        let config: ClusterConfig = serde_json::from_str(
            r#"{"host": "http://localhost:8091", "user": "admin", "pass": "password",
                "customName": "Staging", "watch": false}"#,
        )
        .unwrap();

        assert!(!config.watch);
        assert_eq!(config.custom_name.as_deref(), Some("Staging"));
    }

    #[test]
    fn test_rejects_non_boolean_watch() {
        let result: Result<ClusterConfig, _> = serde_json::from_str(
            r#"{"host": "http://localhost:8091", "user": "admin", "pass": "password", "watch": "yes"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_missing_password() {
        let result: Result<ClusterConfig, _> =
            serde_json::from_str(r#"{"host": "http://localhost:8091", "user": "admin"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_http_scheme_check() {
        assert!(ClusterConfig::new("http://a:8091", "u", "p").has_http_scheme());
        assert!(ClusterConfig::new("https://a:18091", "u", "p").has_http_scheme());
        assert!(!ClusterConfig::new("a:8091", "u", "p").has_http_scheme());
        assert!(!ClusterConfig::new("ftp://a", "u", "p").has_http_scheme());
    }
}
