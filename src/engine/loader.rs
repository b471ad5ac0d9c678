// Jsonp Engine: HTTP Script Loader
//
// Plays the browser's part outside a browser: fetches an injected script's
// `src`, evaluates the JSONP statement it returns and calls the named global.
//
// Nothing here reports back to the waiting task. A failed fetch, an error
// status or a malformed body is logged and the task stays pending (or times
// out, if the bridge was configured to).

use crate::atoms::error::{JsonpError, JsonpResult};
use crate::atoms::types::ScriptElement;
use crate::engine::config::BridgeConfig;
use crate::engine::document::{DocumentHead, ScriptLoader};
use crate::engine::globals::Globals;
use crate::engine::jsonp::parse_jsonp_body;
use crate::engine::page::Page;
use log::{debug, info, warn};
use reqwest::Client;
use std::sync::Arc;

pub struct HttpScriptLoader {
    client: Client,
    globals: Globals,
}

impl HttpScriptLoader {
    pub fn new(globals: Globals, config: &BridgeConfig) -> JsonpResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;
        Ok(HttpScriptLoader { client, globals })
    }

    /// Reuse an existing client (connection pool, TLS settings).
    pub fn with_client(globals: Globals, client: Client) -> Self {
        HttpScriptLoader { client, globals }
    }

    /// A fresh page whose head loads scripts over HTTP.
    pub fn page(config: &BridgeConfig) -> JsonpResult<Page> {
        let globals = Globals::new();
        let loader = Self::new(globals.clone(), config)?;
        Ok(Page::new(globals, DocumentHead::with_loader(Arc::new(loader))))
    }
}

impl ScriptLoader for HttpScriptLoader {
    fn load(&self, script: &ScriptElement) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("[loader] no async runtime, script {} not loaded", script.src);
                return;
            }
        };
        let client = self.client.clone();
        let globals = self.globals.clone();
        let src = script.src.clone();
        handle.spawn(async move {
            match fetch_and_run(&client, &globals, &src).await {
                Ok(name) => debug!("[loader] {} executed `{}`", src, name),
                Err(e) => warn!("[loader] {}: {}", src, e),
            }
        });
    }
}

/// Fetch `src`, parse the JSONP statement, and invoke its callback.
/// Returns the name of the callback the script called.
pub async fn fetch_and_run(client: &Client, globals: &Globals, src: &str) -> JsonpResult<String> {
    let resp = client.get(src).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(JsonpError::Http { status: status.as_u16(), url: src.to_string() });
    }
    let body = resp.text().await?;
    let (name, payload) = parse_jsonp_body(&body)?;
    if !globals.invoke(&name, payload) {
        // Same as a browser: calling an undefined global throws and is lost.
        info!("[loader] {} called `{}`, which is not defined", src, name);
    }
    Ok(name)
}
