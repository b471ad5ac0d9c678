// Jsonp Engine: Global Callback Registry
//
// The page's global namespace, reduced to what the bridges need: functions
// installed and removed by string key, and invoked by name when a response
// script runs. Every installation carries a registration token so that a
// request can later remove its own slot without clobbering a newer
// registration that reused the same name.

use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A function living in the global namespace.
pub type GlobalCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Identifies one installation of a callback.
pub type RegistrationToken = u64;

struct Slot {
    token: RegistrationToken,
    callback: GlobalCallback,
}

/// Shared handle to the callback registry. Cloning shares the namespace.
#[derive(Clone, Default)]
pub struct Globals {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    next_token: Arc<AtomicU64>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `callback` under `name`, replacing whatever lived there.
    pub fn install(&self, name: &str, callback: GlobalCallback) -> RegistrationToken {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let replaced = self
            .slots
            .lock()
            .insert(name.to_string(), Slot { token, callback })
            .is_some();
        if replaced {
            debug!("[globals] `{}` overwritten by registration #{}", name, token);
        }
        token
    }

    /// Delete the slot for `name`, whoever installed it.
    pub fn remove(&self, name: &str) -> bool {
        self.slots.lock().remove(name).is_some()
    }

    /// Delete the slot for `name` only if it still holds registration `token`.
    pub fn remove_if(&self, name: &str, token: RegistrationToken) -> bool {
        let mut slots = self.slots.lock();
        match slots.get(name) {
            Some(slot) if slot.token == token => {
                slots.remove(name);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.lock().contains_key(name)
    }

    /// Token of the registration currently installed under `name`.
    pub fn token_of(&self, name: &str) -> Option<RegistrationToken> {
        self.slots.lock().get(name).map(|slot| slot.token)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Call the function installed under `name` with `payload`, the way a
    /// loaded response script does. Returns `false` if nothing is installed.
    ///
    /// The lock is released before the callback runs, so a callback may
    /// remove its own slot.
    pub fn invoke(&self, name: &str, payload: Value) -> bool {
        let callback = self.slots.lock().get(name).map(|slot| Arc::clone(&slot.callback));
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => {
                debug!("[globals] `{}` is not defined, invocation dropped", name);
                false
            }
        }
    }
}

impl std::fmt::Debug for Globals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.slots.lock().keys().cloned().collect();
        names.sort();
        f.debug_struct("Globals").field("slots", &names).finish()
    }
}
