// ── Jsonp Atoms: Constants ─────────────────────────────────────────────────
// All named constants for the crate live here.

// ── Fixed-callback bridge identifiers ─────────────────────────────────────
// The response script of every fixed-callback request calls this global.
// Endpoints are addressed with `?callback=elmJsonp`, so it is a wire-visible
// name and must stay stable.
pub const FIXED_CALLBACK_NAME: &str = "elmJsonp";

/// Element id given to the fixed bridge's injected script.
pub const FIXED_SCRIPT_ID: &str = "dynScript";

/// `type` attribute of every injected script element.
pub const SCRIPT_TYPE: &str = "text/javascript";

/// Query parameter carrying the callback name to the remote endpoint.
pub const CALLBACK_PARAM: &str = "callback";

// ── Script loader defaults ────────────────────────────────────────────────
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("twitch-jsonp/", env!("CARGO_PKG_VERSION"));

// ── Environment variable names read by `BridgeConfig::from_env` ───────────
pub(crate) const ENV_CALLBACK_TIMEOUT_SECS: &str = "JSONP_CALLBACK_TIMEOUT_SECS";
pub(crate) const ENV_REQUEST_TIMEOUT_SECS: &str = "JSONP_REQUEST_TIMEOUT_SECS";
pub(crate) const ENV_USER_AGENT: &str = "JSONP_USER_AGENT";
