use serde_json::Value;

/// Deep-merge `overrides` into `base`; the override always wins.
///
/// Mappings merge key by key, anything else (scalars, arrays, null)
/// replaces the base value wholesale.
pub fn coalesce(base: &mut Value, overrides: Value) {
    match overrides {
        Value::Object(override_map) => {
            if let Value::Object(base_map) = base {
                for (key, value) in override_map {
                    match base_map.get_mut(&key) {
                        Some(existing) => coalesce(existing, value),
                        None => {
                            base_map.insert(key, value);
                        }
                    }
                }
            } else {
                *base = Value::Object(override_map);
            }
        }
        other => *base = other,
    }
}
