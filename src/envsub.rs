//! Environment variable substitution for loaded configuration values.
//! Rewrites every string leaf, replacing `${NAME}` occurrences with the
//! current process environment. Applied immediately after parsing, before a
//! value is merged or consumed by anything else.

use log::warn;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Recursively resolves `${NAME}` placeholders in every string leaf of
/// `value`. Unset variables keep the literal placeholder and emit a warning;
/// missing secrets must not silently become empty strings.
pub fn resolve_env_vars(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_str(s)),
        Value::Array(arr) => Value::Array(arr.iter().map(resolve_env_vars).collect()),
        Value::Object(obj) => {
            let resolved: Map<String, Value> = obj
                .iter()
                .map(|(key, val)| (key.clone(), resolve_env_vars(val)))
                .collect();
            Value::Object(resolved)
        }
        other => other.clone(),
    }
}

fn resolve_str(input: &str) -> String {
    env_var_pattern()
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            match std::env::var(name) {
                Ok(value) => value,
                Err(_) => {
                    warn!("Environment variable {} not found, keeping placeholder", name);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
