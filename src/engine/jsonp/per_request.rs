// Jsonp Engine: Per-Request Bridge
//
// Each request installs its callback under a caller-chosen name and deletes
// that slot once the response arrives, so any number of requests can be in
// flight. Names must be unique among live requests; reusing one replaces the
// older registration and orphans its task.

use super::{issue, JsonpTask, SlotPolicy};
use crate::atoms::constants::CALLBACK_PARAM;
use crate::atoms::types::ScriptElement;
use crate::engine::config::BridgeConfig;
use crate::engine::page::Page;
use std::time::Duration;

/// Script source for a per-request call: `&` joins an existing query
/// string, `?` starts one.
pub fn per_request_script_src(url: &str, callback_name: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, sep, CALLBACK_PARAM, callback_name)
}

#[derive(Debug, Clone)]
pub struct PerRequestJsonp {
    page: Page,
    timeout: Option<Duration>,
}

impl PerRequestJsonp {
    pub fn new(page: Page) -> Self {
        PerRequestJsonp { page, timeout: None }
    }

    pub fn with_config(page: Page, config: &BridgeConfig) -> Self {
        PerRequestJsonp { page, timeout: config.callback_timeout() }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Issue a request to `url`, answered through the global `callback_name`.
    pub fn jsonp(&self, url: &str, callback_name: &str) -> JsonpTask {
        let script = ScriptElement::new(callback_name, per_request_script_src(url, callback_name));
        issue(&self.page, url, callback_name, script, SlotPolicy::Delete, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::error::JsonpError;
    use futures::FutureExt;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn src_starts_query() {
        assert_eq!(
            per_request_script_src("https://api.test/emotes", "cb_1"),
            "https://api.test/emotes?callback=cb_1"
        );
    }

    #[test]
    fn src_extends_query() {
        assert_eq!(
            per_request_script_src("https://api.test/emotes?limit=5", "cb_1"),
            "https://api.test/emotes?limit=5&callback=cb_1"
        );
    }

    #[tokio::test]
    async fn slot_deleted_after_resolution() {
        let bridge = PerRequestJsonp::new(Page::detached());
        let task = bridge.jsonp("https://api.test/emotes", "cb_9");
        assert!(bridge.page().globals.contains("cb_9"));
        assert!(bridge.page().head.children().is_empty());
        bridge.page().globals.invoke("cb_9", json!({"emotes": []}));
        assert!(!bridge.page().globals.contains("cb_9"));
        assert_eq!(task.await.unwrap(), r#"{"emotes":[]}"#);
    }

    #[tokio::test]
    async fn concurrent_requests_resolve_independently() {
        let bridge = PerRequestJsonp::new(Page::detached());
        let first = bridge.jsonp("https://api.test/a", "cb_1");
        let second = bridge.jsonp("https://api.test/b", "cb_2");

        bridge.page().globals.invoke("cb_2", json!(2));
        assert_eq!(second.await.unwrap(), "2");
        assert!(first.is_pending());
        assert!(bridge.page().globals.contains("cb_1"));

        bridge.page().globals.invoke("cb_1", json!(1));
        assert_eq!(first.await.unwrap(), "1");
        assert!(bridge.page().globals.is_empty());
    }

    #[tokio::test]
    async fn reused_name_orphans_older_request() {
        let bridge = PerRequestJsonp::new(Page::detached());
        let older = bridge.jsonp("https://api.test/a", "cb");
        let newer = bridge.jsonp("https://api.test/b", "cb");
        bridge.page().globals.invoke("cb", json!("x"));
        assert_eq!(newer.await.unwrap(), "\"x\"");
        assert!(!bridge.page().globals.invoke("cb", json!("y")));
        assert!(older.now_or_never().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_rejects_and_cleans_up() {
        let config = BridgeConfig { callback_timeout_secs: Some(5), ..Default::default() };
        let bridge = PerRequestJsonp::with_config(Page::detached(), &config);
        let task = bridge.jsonp("https://api.test/slow", "cb_slow");
        match task.await {
            Err(JsonpError::Timeout { callback, after }) => {
                assert_eq!(callback, "cb_slow");
                assert_eq!(after, Duration::from_secs(5));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!bridge.page().globals.contains("cb_slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_spares_newer_registration() {
        let config = BridgeConfig { callback_timeout_secs: Some(1), ..Default::default() };
        let bridge = PerRequestJsonp::with_config(Page::detached(), &config);
        let older = bridge.jsonp("https://api.test/a", "cb");
        let newer = PerRequestJsonp::new(bridge.page().clone()).jsonp("https://api.test/b", "cb");
        assert!(older.await.unwrap_err().is_timeout());
        assert!(bridge.page().globals.contains("cb"));
        bridge.page().globals.invoke("cb", json!(true));
        assert_eq!(newer.await.unwrap(), "true");
    }
}
