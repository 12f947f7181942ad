//! Deep configuration merging for shellforge.
//! Layers configuration objects with defined override semantics, applied in
//! fixed precedence: profile defaults, user config, project config, then
//! per-request options.

use serde_json::{Map, Value};

/// Deep-merges `source` into `target`, returning a fresh mapping.
/// Neither input is mutated.
///
/// # Rules (applied per key of `source`)
/// - `null` values are skipped, the target's value is retained
/// - arrays replace the target's value wholesale, never concatenated
/// - nested objects recurse, merging against the existing nested object or
///   an empty one if the target holds none
/// - every other value overrides the target directly
pub fn deep_merge(target: &Map<String, Value>, source: &Map<String, Value>) -> Map<String, Value> {
    let mut result = target.clone();

    for (key, value) in source {
        match value {
            Value::Null => continue,
            Value::Array(arr) => {
                result.insert(key.clone(), Value::Array(arr.clone()));
            }
            Value::Object(obj) => {
                let merged = match result.get(key) {
                    Some(Value::Object(existing)) => deep_merge(existing, obj),
                    _ => deep_merge(&Map::new(), obj),
                };
                result.insert(key.clone(), Value::Object(merged));
            }
            other => {
                result.insert(key.clone(), other.clone());
            }
        }
    }

    result
}

/// Applies the four configuration layers lowest to highest precedence:
/// profile defaults, user config, project config, request options.
/// Absent user or project layers are simply skipped.
pub fn merge_layers(
    profile_defaults: &Map<String, Value>,
    user_config: Option<&Map<String, Value>>,
    project_config: Option<&Map<String, Value>>,
    request_options: &Map<String, Value>,
) -> Map<String, Value> {
    let mut result = deep_merge(&Map::new(), profile_defaults);
    if let Some(user) = user_config {
        result = deep_merge(&result, user);
    }
    if let Some(project) = project_config {
        result = deep_merge(&result, project);
    }
    deep_merge(&result, request_options)
}
