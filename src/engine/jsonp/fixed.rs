// Jsonp Engine: Fixed-Callback Bridge
//
// Every request answers through the same global, `elmJsonp`. A second call
// made before the first response arrives overwrites the slot, and the first
// task is never resolved. Callers must serialize requests themselves.
//
// The slot is left installed after it fires. A repeated invocation finds a
// spent completion and does nothing.

use super::{issue, JsonpTask, SlotPolicy};
use crate::atoms::constants::{CALLBACK_PARAM, FIXED_CALLBACK_NAME, FIXED_SCRIPT_ID};
use crate::atoms::types::ScriptElement;
use crate::engine::config::BridgeConfig;
use crate::engine::page::Page;
use std::time::Duration;

/// Script source for a fixed-callback request. The callback parameter is
/// always introduced with `?`, even if `url` already carries a query string.
pub fn fixed_script_src(url: &str) -> String {
    format!("{}?{}={}", url, CALLBACK_PARAM, FIXED_CALLBACK_NAME)
}

#[derive(Debug, Clone)]
pub struct FixedJsonp {
    page: Page,
    timeout: Option<Duration>,
}

impl FixedJsonp {
    pub fn new(page: Page) -> Self {
        FixedJsonp { page, timeout: None }
    }

    pub fn with_config(page: Page, config: &BridgeConfig) -> Self {
        FixedJsonp { page, timeout: config.callback_timeout() }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Issue a request to `url`. The returned task resolves with the JSON
    /// text of whatever `elmJsonp` is next called with.
    pub fn jsonp(&self, url: &str) -> JsonpTask {
        let script = ScriptElement::new(FIXED_SCRIPT_ID, fixed_script_src(url));
        issue(&self.page, url, FIXED_CALLBACK_NAME, script, SlotPolicy::Keep, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::RequestState;
    use futures::FutureExt;
    use serde_json::json;

    #[test]
    fn src_appends_fixed_callback() {
        assert_eq!(
            fixed_script_src("https://tmi.twitch.tv/group/user/foo/chatters"),
            "https://tmi.twitch.tv/group/user/foo/chatters?callback=elmJsonp"
        );
    }

    #[test]
    fn src_ignores_existing_query() {
        assert_eq!(
            fixed_script_src("https://api.test/x?a=1"),
            "https://api.test/x?a=1?callback=elmJsonp"
        );
    }

    #[test]
    fn script_is_detached_on_return() {
        let bridge = FixedJsonp::new(Page::detached());
        let task = bridge.jsonp("https://api.test/chat");
        let script = task.script().unwrap();
        assert_eq!(script.id, "dynScript");
        assert_eq!(script.script_type, "text/javascript");
        assert!(!bridge.page().head.contains(script));
        assert!(bridge.page().head.children().is_empty());
    }

    #[tokio::test]
    async fn resolves_with_json_text() {
        let bridge = FixedJsonp::new(Page::detached());
        let task = bridge.jsonp("https://api.test/chat");
        assert_eq!(task.state(), RequestState::AwaitingCallback);
        assert!(bridge.page().globals.invoke("elmJsonp", json!({"chatters": 3})));
        assert_eq!(task.state(), RequestState::Resolved);
        assert_eq!(task.await.unwrap(), r#"{"chatters":3}"#);
    }

    #[tokio::test]
    async fn integral_doubles_resolve_like_json_stringify() {
        let bridge = FixedJsonp::new(Page::detached());
        let task = bridge.jsonp("https://api.test/chat");
        let (name, payload) =
            crate::engine::jsonp::parse_jsonp_body(r#"elmJsonp({"a":1.0,"b":1e2,"c":-0})"#).unwrap();
        assert!(bridge.page().globals.invoke(&name, payload));
        assert_eq!(task.await.unwrap(), r#"{"a":1,"b":100,"c":0}"#);
    }

    #[tokio::test]
    async fn slot_survives_resolution() {
        let bridge = FixedJsonp::new(Page::detached());
        let task = bridge.jsonp("https://api.test/chat");
        bridge.page().globals.invoke("elmJsonp", json!(1));
        task.await.unwrap();
        assert!(bridge.page().globals.contains("elmJsonp"));
        // Stale slot: still callable, resolves nothing.
        assert!(bridge.page().globals.invoke("elmJsonp", json!(2)));
    }

    #[tokio::test]
    async fn later_call_orphans_earlier() {
        let bridge = FixedJsonp::new(Page::detached());
        let first = bridge.jsonp("https://api.test/a");
        let second = bridge.jsonp("https://api.test/b");
        bridge.page().globals.invoke("elmJsonp", json!("b-payload"));
        assert_eq!(second.await.unwrap(), "\"b-payload\"");
        assert!(first.is_pending());
        bridge.page().globals.invoke("elmJsonp", json!("a-payload"));
        assert!(first.now_or_never().is_none());
    }
}
