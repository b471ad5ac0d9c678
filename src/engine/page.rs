// Jsonp Engine: Page
//
// Bundles the two platform primitives a bridge runs against: the global
// callback namespace and the document head.

use super::document::{DocumentHead, ScriptLoader};
use super::globals::Globals;
use std::sync::Arc;

#[derive(Clone)]
pub struct Page {
    pub globals: Globals,
    pub head: Arc<DocumentHead>,
}

impl Page {
    pub fn new(globals: Globals, head: DocumentHead) -> Self {
        Page { globals, head: Arc::new(head) }
    }

    /// A page whose head never loads anything. Tests and embedders that
    /// deliver responses themselves call `globals.invoke` directly.
    pub fn detached() -> Self {
        Page {
            globals: Globals::new(),
            head: Arc::new(DocumentHead::detached()),
        }
    }

    /// A page whose head forwards appended scripts to a loader built from the
    /// page's own globals.
    pub fn with_loader<L, F>(make_loader: F) -> Self
    where
        L: ScriptLoader + 'static,
        F: FnOnce(Globals) -> L,
    {
        let globals = Globals::new();
        let loader: Arc<dyn ScriptLoader> = Arc::new(make_loader(globals.clone()));
        Page {
            globals,
            head: Arc::new(DocumentHead::with_loader(loader)),
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("globals", &self.globals)
            .field("head", &self.head.children())
            .finish()
    }
}
