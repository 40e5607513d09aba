//! Defaulted lookups into management API payloads.
//!
//! Payloads are loosely typed and fields come and go between server
//! versions, so every read goes through a path lookup with a fallback.

use serde_json::Value;

/// Path lookups on a JSON value.
///
/// A path is a slice of object keys; any missing key, or a non-object on
/// the way down, yields the fallback.
pub trait JsonExt {
    /// Value at `path`, if present.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    /// Number at `path`, or `0.0`.
    fn f64_at(&self, path: &[&str]) -> f64 {
        self.at(path).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// String at `path`, or `default`.
    fn str_at(&self, path: &[&str], default: &str) -> String {
        self.at(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Clone of the value at `path`, or `default`.
    fn value_at(&self, path: &[&str], default: Value) -> Value {
        self.at(path).cloned().unwrap_or(default)
    }
}

impl JsonExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(*key))
    }
}
