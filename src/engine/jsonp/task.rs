// Jsonp Engine: Single-Shot Task
//
// `JsonpTask` is the deferred handle a bridge returns synchronously. It is
// completed from the outside: the callback installed in `Globals` owns a
// `Completion` and fires it when the response script runs. The task keeps
// the same `Completion` alive, so an orphaned request (its slot overwritten)
// never observes a dropped sender. It just stays pending, as it would in a
// browser.

use crate::atoms::error::{JsonpError, JsonpResult};
use crate::atoms::types::{RequestState, ScriptElement};
use crate::engine::globals::{Globals, RegistrationToken};
use super::body::stringify;
use log::{debug, warn};
use parking_lot::Mutex;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, Sleep};

// ── Completion ─────────────────────────────────────────────────────────────

/// The resolving half of a Pending Request.
pub(crate) struct Completion {
    tx: Mutex<Option<oneshot::Sender<String>>>,
    state: Mutex<RequestState>,
}

impl Completion {
    pub(crate) fn new() -> (Arc<Self>, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        let completion = Arc::new(Completion {
            tx: Mutex::new(Some(tx)),
            state: Mutex::new(RequestState::Created),
        });
        (completion, rx)
    }

    pub(crate) fn mark_awaiting(&self) {
        let mut state = self.state.lock();
        if *state == RequestState::Created {
            *state = RequestState::AwaitingCallback;
        }
    }

    /// Resolve with the JSON text of `payload`. Only the first call wins.
    pub(crate) fn resolve(&self, payload: &Value) -> bool {
        let Some(tx) = self.tx.lock().take() else {
            return false;
        };
        *self.state.lock() = RequestState::Resolved;
        // A dropped receiver means the caller lost interest; nothing to do.
        let _ = tx.send(stringify(payload));
        true
    }

    fn expire(&self) -> bool {
        if self.tx.lock().take().is_none() {
            return false;
        }
        *self.state.lock() = RequestState::TimedOut;
        true
    }

    fn state(&self) -> RequestState {
        *self.state.lock()
    }
}

// ── Deadline ───────────────────────────────────────────────────────────────

/// Optional watchdog: on expiry the task rejects and deregisters its slot,
/// provided the slot still belongs to this request. The clock starts when
/// the request is issued, not when the task is first polled.
pub(crate) struct Deadline {
    after: Duration,
    at: Instant,
    sleep: Option<Pin<Box<Sleep>>>,
    globals: Globals,
    token: RegistrationToken,
}

impl Deadline {
    pub(crate) fn new(after: Duration, globals: Globals, token: RegistrationToken) -> Self {
        Deadline { after, at: Instant::now() + after, sleep: None, globals, token }
    }

    fn poll_expired(&mut self, cx: &mut Context<'_>) -> bool {
        // The timer itself is created on first poll so the bridge call needs
        // no runtime.
        let at = self.at;
        let sleep = self
            .sleep
            .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(at)));
        sleep.as_mut().poll(cx).is_ready()
    }
}

// ── JsonpTask ──────────────────────────────────────────────────────────────

enum Inner {
    Ready(Option<String>),
    Waiting {
        rx: oneshot::Receiver<String>,
        completion: Arc<Completion>,
        deadline: Option<Deadline>,
    },
    Done(RequestState),
}

/// Deferred result of one JSONP call. Resolves with the payload as JSON text.
///
/// Fails only with [`JsonpError::Timeout`], and only when the bridge was
/// configured with a callback timeout.
pub struct JsonpTask {
    url: String,
    callback: String,
    script: Option<ScriptElement>,
    inner: Inner,
}

impl JsonpTask {
    /// A task that is already resolved with `text`.
    pub fn succeed(text: impl Into<String>) -> Self {
        JsonpTask {
            url: String::new(),
            callback: String::new(),
            script: None,
            inner: Inner::Ready(Some(text.into())),
        }
    }

    pub(crate) fn waiting(
        url: &str,
        callback: &str,
        script: ScriptElement,
        completion: Arc<Completion>,
        rx: oneshot::Receiver<String>,
        deadline: Option<Deadline>,
    ) -> Self {
        JsonpTask {
            url: url.to_string(),
            callback: callback.to_string(),
            script: Some(script),
            inner: Inner::Waiting { rx, completion, deadline },
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn callback_name(&self) -> &str {
        &self.callback
    }

    /// The script element injected for this request.
    pub fn script(&self) -> Option<&ScriptElement> {
        self.script.as_ref()
    }

    pub fn state(&self) -> RequestState {
        match &self.inner {
            Inner::Ready(_) => RequestState::Resolved,
            Inner::Waiting { completion, .. } => completion.state(),
            Inner::Done(state) => *state,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == RequestState::AwaitingCallback
    }
}

impl Future for JsonpTask {
    type Output = JsonpResult<String>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outcome = match &mut this.inner {
            Inner::Ready(text) => match text.take() {
                Some(text) => Ok(text),
                None => panic!("JsonpTask polled after completion"),
            },
            Inner::Done(_) => panic!("JsonpTask polled after completion"),
            Inner::Waiting { rx, completion, deadline } => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(text)) => Ok(text),
                // The sender lives in `completion`, which this task owns, and
                // `expire` only drops it on the way to `Done`. Reaching this
                // arm means that invariant broke and the task would hang.
                Poll::Ready(Err(_)) => {
                    debug_assert!(false, "JsonpTask sender dropped while awaiting `{}`", this.callback);
                    warn!("[jsonp] sender for `{}` dropped, task can never resolve", this.callback);
                    return Poll::Pending;
                }
                Poll::Pending => {
                    let Some(deadline) = deadline else {
                        return Poll::Pending;
                    };
                    if !deadline.poll_expired(cx) || !completion.expire() {
                        return Poll::Pending;
                    }
                    if deadline.globals.remove_if(&this.callback, deadline.token) {
                        debug!("[jsonp] `{}` deregistered after timeout", this.callback);
                    }
                    warn!(
                        "[jsonp] no callback for `{}` after {:?} ({})",
                        this.callback, deadline.after, this.url
                    );
                    Err(JsonpError::timeout(this.callback.clone(), deadline.after))
                }
            },
        };
        this.inner = Inner::Done(match outcome {
            Ok(_) => RequestState::Resolved,
            Err(_) => RequestState::TimedOut,
        });
        Poll::Ready(outcome)
    }
}

impl std::fmt::Debug for JsonpTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonpTask")
            .field("url", &self.url)
            .field("callback", &self.callback)
            .field("state", &self.state())
            .finish()
    }
}
