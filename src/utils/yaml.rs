use serde_yaml::{Mapping, Value};

/// Parse a profile document and expand `<<` merge keys
pub fn parse_profile(content: &str) -> serde_yaml::Result<Value> {
    let mut profile: Value = serde_yaml::from_str(content)?;
    profile.apply_merge()?;
    Ok(profile)
}

/// Borrow a sequence stored under `key` in a mapping value
pub fn get_sequence<'a>(node: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    node.get(key).and_then(Value::as_sequence)
}

/// Read a boolean stored under a dotted path such as `dns.ipv6`.
///
/// Non-boolean values are treated as absent.
pub fn get_bool(node: &Value, path: &str) -> Option<bool> {
    let mut current = node;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = current.get(part)?;
    }
    current.as_bool()
}

/// Insert or replace a top-level key, keeping the position of existing keys
pub fn set_key(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::String(key.to_string()), value);
}

/// Merge every entry of `source` into `target`, replacing on conflict
pub fn merge_mapping(target: &mut Mapping, source: &Mapping) {
    for (k, v) in source {
        target.insert(k.clone(), v.clone());
    }
}
