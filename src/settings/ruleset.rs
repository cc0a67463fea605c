use serde::{Deserialize, Serialize};

use crate::models::{RuleBehavior, RuleFormat, RuleProviderType};

/// Remote rule sets exposed as `rule-providers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuleProviderSettings {
    /// Emit the `rule-providers` section and `RULE-SET` rules at all
    pub enabled: bool,
    /// Prefix the rule set name is appended to when building the URL
    pub base_url: String,
    /// Local cache directory the client stores downloads in
    pub path_prefix: String,
    #[serde(rename = "type")]
    pub provider_type: RuleProviderType,
    pub format: RuleFormat,
    pub behavior: RuleBehavior,
    /// Refresh interval in seconds
    pub interval: u32,
    /// Rule sets routed to `DIRECT`
    pub direct: Vec<String>,
    /// Rule sets routed to the AI group
    pub ai: Vec<String>,
    /// Rule sets routed to the default group
    pub proxy: Vec<String>,
}

impl Default for RuleProviderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            path_prefix: "RuleProvider/".to_string(),
            provider_type: RuleProviderType::Http,
            format: RuleFormat::Yaml,
            behavior: RuleBehavior::Classical,
            interval: 86400,
            direct: Vec::new(),
            ai: Vec::new(),
            proxy: Vec::new(),
        }
    }
}

/// Fixed rules surrounding the rule-set rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RoutingSettings {
    /// `GEOIP,private,DIRECT,no-resolve` first
    pub lan_direct: bool,
    /// `GEOSITE,cn,DIRECT` and `GEOIP,cn,DIRECT`
    pub china_direct: bool,
    /// GEOSITE codes routed to the AI group
    pub ai_geosites: Vec<String>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            lan_direct: true,
            china_direct: true,
            ai_geosites: Vec::new(),
        }
    }
}
