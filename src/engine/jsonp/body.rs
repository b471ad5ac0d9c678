// Jsonp Engine: Response Script Evaluation
//
// A JSONP response is a single statement calling the named global with a
// JSON literal. Accepted shapes:
//   cb({...})
//   cb({...});
//   /**/cb({...});
//   /**/ typeof cb === 'function' && cb({...});

use crate::atoms::error::{JsonpError, JsonpResult};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static JSONP_CALL: OnceLock<Regex> = OnceLock::new();

fn jsonp_call() -> &'static Regex {
    JSONP_CALL.get_or_init(|| {
        Regex::new(
            r#"(?s)^\s*(?:/\*\*/)?\s*(?:typeof\s+[A-Za-z_$][\w$.]*\s*===?\s*['"]function['"]\s*&&\s*)?([A-Za-z_$][\w$.]*)\s*\((.*)\)\s*;?\s*$"#,
        )
        .expect("static JSONP pattern")
    })
}

/// Split a response script into the callback it calls and the decoded payload.
pub fn parse_jsonp_body(body: &str) -> JsonpResult<(String, Value)> {
    let caps = jsonp_call()
        .captures(body)
        .ok_or_else(|| JsonpError::malformed(preview(body)))?;
    let name = caps[1].to_string();
    let payload: Value = serde_json::from_str(caps[2].trim())?;
    Ok((name, payload))
}

/// Largest integer an IEEE double holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize `payload` the way `JSON.stringify` prints a parsed value.
/// Integral doubles lose their fraction (`1.0` → `1`, `1e2` → `100`,
/// `-0` → `0`); key order is kept.
pub fn stringify(payload: &Value) -> String {
    normalize_numbers(payload).to_string()
}

fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(x) if x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER => {
                // `-0.0 as i64` is 0.
                Value::from(x as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), normalize_numbers(v))).collect(),
        ),
        _ => value.clone(),
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(80) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
