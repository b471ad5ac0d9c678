// Jsonp Engine: Bridge Configuration
//
// One serde struct with defaults, loadable from TOML or the environment.
// Without a callback timeout the bridges keep their historical contract: a
// task either resolves or waits forever.

use crate::atoms::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, ENV_CALLBACK_TIMEOUT_SECS,
    ENV_REQUEST_TIMEOUT_SECS, ENV_USER_AGENT,
};
use crate::atoms::error::{JsonpError, JsonpResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Reject a pending task after this many seconds without a callback,
    /// counted from when the request is issued.
    /// `None` leaves tasks pending indefinitely.
    pub callback_timeout_secs: Option<u64>,
    /// Per-fetch timeout used by the HTTP script loader.
    pub request_timeout_secs: u64,
    /// User-Agent sent by the HTTP script loader.
    pub user_agent: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            callback_timeout_secs: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn callback_timeout(&self) -> Option<Duration> {
        self.callback_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_toml_str(src: &str) -> JsonpResult<Self> {
        let config: BridgeConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `JSONP_*` environment variables.
    pub fn from_env() -> JsonpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JsonpResult<Self> {
        let mut config = BridgeConfig::default();
        if let Some(raw) = lookup(ENV_CALLBACK_TIMEOUT_SECS) {
            config.callback_timeout_secs = Some(parse_secs(ENV_CALLBACK_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }
        if let Some(ua) = lookup(ENV_USER_AGENT) {
            config.user_agent = ua;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> JsonpResult<()> {
        if self.callback_timeout_secs == Some(0) {
            return Err(JsonpError::Config("callback_timeout_secs must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(JsonpError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, raw: &str) -> JsonpResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| JsonpError::Config(format!("{}={:?}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_have_no_callback_timeout() {
        let config = BridgeConfig::default();
        assert_eq!(config.callback_timeout(), None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("twitch-jsonp/"));
    }

    #[test]
    fn toml_partial_keeps_defaults() {
        let config = BridgeConfig::from_toml_str("callback_timeout_secs = 15\n").unwrap();
        assert_eq!(config.callback_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn toml_rejects_zero_timeout() {
        let err = BridgeConfig::from_toml_str("request_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, JsonpError::Config(_)));
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("JSONP_CALLBACK_TIMEOUT_SECS", " 5 "),
            ("JSONP_USER_AGENT", "chat-viewer/1.0"),
        ]
        .into_iter()
        .collect();
        let config = BridgeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.callback_timeout_secs, Some(5));
        assert_eq!(config.user_agent, "chat-viewer/1.0");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn env_rejects_garbage() {
        let err = BridgeConfig::from_lookup(|k| {
            (k == "JSONP_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("JSONP_REQUEST_TIMEOUT_SECS"));
    }
}
