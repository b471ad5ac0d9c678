// Jsonp Engine: Document Head
//
// The part of the page the bridges touch: a `head` node that accepts and
// drops script children. Appending a script hands it to the page's
// `ScriptLoader`, which starts the fetch. Removing the node afterwards only
// detaches it; the load already in progress keeps going.

use crate::atoms::types::ScriptElement;
use log::trace;
use parking_lot::Mutex;
use std::sync::Arc;

/// The page's script-loading machinery.
pub trait ScriptLoader: Send + Sync {
    /// Begin loading `script`. Must not block; completion is signalled by the
    /// loaded script invoking a global callback.
    fn load(&self, script: &ScriptElement);
}

/// A document `head` node holding script children.
#[derive(Default)]
pub struct DocumentHead {
    children: Mutex<Vec<ScriptElement>>,
    loader: Option<Arc<dyn ScriptLoader>>,
}

impl DocumentHead {
    /// A head with no loader attached. Appended scripts are never fetched;
    /// callbacks must be invoked through `Globals` directly.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_loader(loader: Arc<dyn ScriptLoader>) -> Self {
        DocumentHead {
            children: Mutex::new(Vec::new()),
            loader: Some(loader),
        }
    }

    pub fn append_child(&self, script: &ScriptElement) {
        self.children.lock().push(script.clone());
        trace!("[head] appended #{} src={}", script.id, script.src);
        if let Some(loader) = &self.loader {
            loader.load(script);
        }
    }

    /// Detach the first child equal to `script`. Returns whether one was found.
    pub fn remove_child(&self, script: &ScriptElement) -> bool {
        let mut children = self.children.lock();
        match children.iter().position(|child| child == script) {
            Some(idx) => {
                children.remove(idx);
                trace!("[head] removed #{}", script.id);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, script: &ScriptElement) -> bool {
        self.children.lock().iter().any(|child| child == script)
    }

    pub fn children(&self) -> Vec<ScriptElement> {
        self.children.lock().clone()
    }
}
