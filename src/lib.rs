//! JSONP bridge for the Twitch chat viewer.
//!
//! A request is made by injecting a script element whose `src` names a
//! global callback; the response script calls that global, which resolves a
//! single-shot [`JsonpTask`] with the payload as JSON text.
//!
//! Two bridges are provided:
//! - [`FixedJsonp`]: every request answers through `elmJsonp`, so only one
//!   request may be in flight.
//! - [`PerRequestJsonp`]: each request names its own callback and removes it
//!   once answered.
//!
//! ```no_run
//! use twitch_jsonp::{BridgeConfig, HttpScriptLoader, PerRequestJsonp};
//!
//! # async fn run() -> twitch_jsonp::JsonpResult<()> {
//! let config = BridgeConfig::from_env()?;
//! let page = HttpScriptLoader::page(&config)?;
//! let bridge = PerRequestJsonp::with_config(page, &config);
//! let text = bridge.jsonp("https://tmi.twitch.tv/group/user/foo/chatters", "cb_1").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod atoms;
pub mod engine;

pub use atoms::constants::FIXED_CALLBACK_NAME;
pub use atoms::error::{JsonpError, JsonpResult};
pub use atoms::types::{RequestState, ScriptElement};
pub use engine::config::BridgeConfig;
pub use engine::document::{DocumentHead, ScriptLoader};
pub use engine::globals::{GlobalCallback, Globals};
pub use engine::jsonp::{
    fixed_script_src, parse_jsonp_body, per_request_script_src, stringify, FixedJsonp,
    JsonpTask, PerRequestJsonp,
};
pub use engine::loader::{fetch_and_run, HttpScriptLoader};
pub use engine::page::Page;
