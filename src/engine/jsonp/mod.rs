// Jsonp Engine: Bridges
//
// Two alternative ways of making a script-injected request and getting its
// payload back as a single-shot task:
//   - FixedJsonp       one well-known global callback, one request at a time
//   - PerRequestJsonp  a caller-named callback per request, many in flight
//
// Both follow the same sequence: install callback → build script → append to
// head → detach immediately → hand back the task. The response script later
// calls the installed function, which resolves the task.

mod body;
mod fixed;
mod per_request;
mod task;

pub use body::{parse_jsonp_body, stringify};
pub use fixed::{fixed_script_src, FixedJsonp};
pub use per_request::{per_request_script_src, PerRequestJsonp};
pub use task::JsonpTask;

use crate::atoms::types::ScriptElement;
use crate::engine::globals::GlobalCallback;
use crate::engine::page::Page;
use log::debug;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use task::{Completion, Deadline};

/// What the installed callback does after resolving its task.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SlotPolicy {
    /// Leave the function installed.
    Keep,
    /// Delete the slot once the callback has fired.
    Delete,
}

/// Shared request sequence for both bridges.
fn issue(
    page: &Page,
    url: &str,
    callback_name: &str,
    script: ScriptElement,
    policy: SlotPolicy,
    timeout: Option<Duration>,
) -> JsonpTask {
    let (completion, rx) = Completion::new();

    let callback: GlobalCallback = {
        let completion = Arc::clone(&completion);
        // Only a deleting slot needs its own handle on the namespace.
        let globals = (policy == SlotPolicy::Delete).then(|| page.globals.clone());
        let name = callback_name.to_string();
        Arc::new(move |payload: Value| {
            if !completion.resolve(&payload) {
                debug!("[jsonp] `{}` invoked again after completion, ignored", name);
            }
            if let Some(globals) = &globals {
                globals.remove(&name);
            }
        })
    };
    let token = page.globals.install(callback_name, callback);
    completion.mark_awaiting();

    page.head.append_child(&script);
    page.head.remove_child(&script);
    debug!("[jsonp] issued {} via `{}`", script.src, callback_name);

    let deadline = timeout.map(|after| Deadline::new(after, page.globals.clone(), token));
    JsonpTask::waiting(url, callback_name, script, completion, rx, deadline)
}
