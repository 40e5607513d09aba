//! Outcome of a single management API call.

use std::time::Duration;

/// The result of one fetch against a cluster management endpoint.
///
/// Every failure mode is a variant rather than an error, so fan-out code can
/// collect results without short-circuiting. The variants share one
/// [`message`](FetchResult::message) surface for display while staying
/// distinguishable for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    /// The endpoint answered 200 with a parseable payload.
    Success(T),
    /// The endpoint answered with a non-200 status.
    HttpError { status: u16, message: String },
    /// The request never produced a usable response (DNS, refused
    /// connection, malformed body, client-side timeout).
    TransportError { message: String },
    /// An outer deadline elapsed before the call completed.
    Timeout { elapsed: Duration, message: String },
}

impl<T> FetchResult<T> {
    /// Non-200 response.
    pub fn http_error(status: u16) -> Self {
        FetchResult::HttpError {
            status,
            message: format!("Failed with status {}", status),
        }
    }

    /// Transport-level failure carrying the underlying description.
    pub fn transport(message: impl Into<String>) -> Self {
        FetchResult::TransportError {
            message: message.into(),
        }
    }

    /// Deadline exceeded after `elapsed`.
    pub fn timeout(elapsed: Duration) -> Self {
        FetchResult::Timeout {
            elapsed,
            message: format!("Request timeout after {} seconds", format_seconds(elapsed)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    /// Human-readable failure text, `None` on success.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchResult::Success(_) => None,
            FetchResult::HttpError { message, .. }
            | FetchResult::TransportError { message }
            | FetchResult::Timeout { message, .. } => Some(message),
        }
    }

    /// Split into the `(payload, error)` pair used by the wire envelopes.
    pub fn into_parts(self) -> (Option<T>, Option<String>) {
        match self {
            FetchResult::Success(payload) => (Some(payload), None),
            FetchResult::HttpError { message, .. }
            | FetchResult::TransportError { message }
            | FetchResult::Timeout { message, .. } => (None, Some(message)),
        }
    }
}

/// Whole seconds print without a fraction ("15"), anything else as a decimal ("0.5").
fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        duration.as_secs().to_string()
    } else {
        duration.as_secs_f64().to_string()
    }
}
