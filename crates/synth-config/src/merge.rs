//! Deep merge of settings trees

use serde_json::Value;

/// Deep merge `other` into `base`.
///
/// If both values are mappings, merge them recursively with `other` taking
/// precedence. Otherwise, `other` replaces `base` entirely, sequences
/// included.
pub fn deep_merge(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, other_val);
                } else {
                    base_map.insert(key.clone(), other_val.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

/// Merge a sequence of layers left to right, later layers winning.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = Value::Object(Default::default());
    for layer in layers {
        deep_merge(&mut merged, layer);
    }
    merged
}
