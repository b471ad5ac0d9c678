// ── Jsonp Atoms: Error Types ───────────────────────────────────────────────
// Single canonical error enum for the bridge, built with `thiserror`.
//
// Design rules:
//   • A `JsonpTask` only ever fails with `Timeout`; a bridge without a
//     configured timeout has no failure channel at all.
//   • Loader and config failures are reported through the other variants and
//     logged at the layer that sees them. They never reach a waiting task.
//   • The `#[from]` attribute wires external error conversions automatically.

use std::time::Duration;
use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum JsonpError {
    /// No callback invocation arrived within the configured bound.
    #[error("JSONP callback `{callback}` not invoked within {after:?}")]
    Timeout { callback: String, after: Duration },

    /// HTTP / network failure while loading a script (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} loading {url}")]
    Http { status: u16, url: String },

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body is not a `<name>(<json>)` statement.
    #[error("Malformed JSONP script: {0}")]
    MalformedScript(String),

    /// Bridge configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl JsonpError {
    pub fn timeout(callback: impl Into<String>, after: Duration) -> Self {
        Self::Timeout { callback: callback.into(), after }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedScript(detail.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<toml::de::Error> for JsonpError {
    fn from(e: toml::de::Error) -> Self {
        JsonpError::Config(e.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All bridge operations return this type.
pub type JsonpResult<T> = Result<T, JsonpError>;

// ── Conversion: JsonpError → String ────────────────────────────────────────

impl From<JsonpError> for String {
    fn from(e: JsonpError) -> Self {
        e.to_string()
    }
}
