// ── Jsonp Atoms: Pure Data Types ───────────────────────────────────────────
// Plain struct/enum definitions with no logic beyond construction.
// Atoms layer rule: no I/O, no side effects, no imports from engine/.

use serde::{Deserialize, Serialize};

use super::constants::SCRIPT_TYPE;

/// A `<script>` element injected into the document head to trigger a load.
/// `src` carries both the target endpoint and the callback parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptElement {
    pub id: String,
    #[serde(rename = "type")]
    pub script_type: String,
    pub src: String,
}

impl ScriptElement {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        ScriptElement {
            id: id.into(),
            script_type: SCRIPT_TYPE.to_string(),
            src: src.into(),
        }
    }
}

/// Where a Pending Request is in its lifecycle.
///
/// `Created` is transient: the bridge moves every request to
/// `AwaitingCallback` before handing the task back. There is no way back
/// from `AwaitingCallback` except through a callback or a configured timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Created,
    AwaitingCallback,
    Resolved,
    TimedOut,
}
