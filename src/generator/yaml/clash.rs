use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::models::ProxyGroupType;

fn is_empty_option_string(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, str::is_empty)
}

fn is_empty_option_vec(v: &Option<Vec<String>>) -> bool {
    v.as_ref().map_or(true, Vec::is_empty)
}

/// DNS configuration for Clash
///
/// Used both as the injected template and as the emitted `dns` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClashDns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub listen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub cache_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_h3: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respect_rules: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub enhanced_mode: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub direct_nameserver: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub default_nameserver: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub nameserver: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub proxy_server_nameserver: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub fallback: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub fake_ip_range: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub fake_ip_range_v6: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_vec")]
    pub fake_ip_filter: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra_options: Mapping,
}

/// Health-check and policy knobs attached to a generated group.
///
/// The builder never interprets these; they are merged into the record as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GroupOptions {
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_udp: Option<bool>,
    #[serde(flatten)]
    pub extra_options: Mapping,
}

impl GroupOptions {
    /// Options for a group that probes its members against `url`
    pub fn health_check(url: impl Into<String>, interval: u32) -> Self {
        Self {
            url: Some(url.into()),
            interval: Some(interval),
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }
}

/// Represents a proxy group in Clash configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: ProxyGroupType,
    pub proxies: Vec<String>,
    #[serde(flatten)]
    pub options: GroupOptions,
}

impl ClashProxyGroup {
    /// A plain `select` group over the given members
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            group_type: ProxyGroupType::Select,
            proxies,
            options: GroupOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_group_record_layout() {
        let group = ClashProxyGroup {
            name: "UrlTest".to_string(),
            group_type: ProxyGroupType::URLTest,
            proxies: vec!["HK-1".to_string()],
            options: GroupOptions::health_check("https://www.gstatic.com/generate_204", 900)
                .with_tolerance(150)
                .with_lazy(true),
        };

        let value = serde_yaml::to_value(&group).unwrap();
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["name", "type", "proxies", "url", "interval", "tolerance", "lazy"]
        );
        assert_eq!(value["type"].as_str(), Some("url-test"));
        assert_eq!(value["lazy"].as_bool(), Some(true));
    }

    #[test]
    fn test_extra_group_options_are_merged_verbatim() {
        let mut options = GroupOptions::default();
        options.extra_options.insert(
            Value::String("expected-status".to_string()),
            Value::Number(204.into()),
        );
        let group = ClashProxyGroup {
            options,
            ..ClashProxyGroup::select("Select", vec!["US-1".to_string()])
        };

        let value = serde_yaml::to_value(&group).unwrap();
        assert_eq!(value["expected-status"].as_u64(), Some(204));
        assert!(value.get("url").is_none());
    }

    #[test]
    fn test_dns_skips_unset_fields() {
        let dns = ClashDns {
            enable: Some(true),
            nameserver: Some(vec!["https://dns.google/dns-query".to_string()]),
            fallback: Some(Vec::new()),
            ..Default::default()
        };
        let value = serde_yaml::to_value(&dns).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(value["enable"].as_bool(), Some(true));
    }
}
