use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

/// A concrete connection target taken from the profile's `proxies` list.
///
/// Only `name` is interpreted; everything else is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(flatten)]
    pub extra_options: HashMap<String, Value>,
}

impl Endpoint {
    /// Create an endpoint with no connection parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra_options: HashMap::new(),
        }
    }

    /// Read an endpoint from a YAML mapping.
    ///
    /// Returns `None` when the entry has no non-empty string `name`.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        let map = value.as_mapping()?;
        let name = map.get("name").and_then(Value::as_str)?;
        if name.is_empty() {
            return None;
        }

        let extra_options = map
            .iter()
            .filter_map(|(k, v)| {
                let key = k.as_str()?;
                (key != "name").then(|| (key.to_string(), v.clone()))
            })
            .collect();

        Some(Self {
            name: name.to_string(),
            extra_options,
        })
    }
}

/// Collect every usable endpoint from a `proxies` sequence
pub fn endpoints_from_yaml(proxies: &[Value]) -> Vec<Endpoint> {
    proxies.iter().filter_map(Endpoint::from_yaml).collect()
}

/// Names of all endpoints, in input order
pub fn extract_all_proxies(endpoints: &[Endpoint]) -> Vec<String> {
    endpoints.iter().map(|e| e.name.clone()).collect()
}
