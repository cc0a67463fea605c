//! Settings for one overwrite pass.
//!
//! Every constant table the generator needs (DNS servers, rule sets, group
//! keywords, region patterns) lives here and is handed to the generator
//! explicitly. Settings files may be YAML or TOML and only need to name the
//! keys they change; everything else comes from a [`Preset`].

pub mod presets;
pub mod ruleset;

use log::info;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::{Error, Result};
use crate::generator::config::dns::Ipv6Source;
use crate::generator::config::region::{RegionPriority, RegionSpec};
use crate::generator::yaml::clash::{ClashDns, GroupOptions};
use crate::models::ProxyGroupType;
use crate::utils::file_get;
use crate::utils::yaml::merge_mapping;

pub use presets::Preset;
pub use ruleset::{RoutingSettings, RuleProviderSettings};

/// A generated group whose members are taken from an existing group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeywordGroupSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: ProxyGroupType,
    /// Name fragments identifying the source group
    pub keywords: Vec<String>,
    #[serde(default)]
    pub options: GroupOptions,
    /// Reorder members by region after resolution
    #[serde(default)]
    pub prioritize_regions: bool,
}

impl KeywordGroupSpec {
    pub fn new(name: &str, group_type: ProxyGroupType, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            group_type,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            options: GroupOptions::default(),
            prioritize_regions: false,
        }
    }

    pub fn with_options(mut self, options: GroupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn prioritized(mut self) -> Self {
        self.prioritize_regions = true;
        self
    }
}

/// Names and layout of the generated `proxy-groups`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GroupSettings {
    /// Top-level selector the `MATCH` rule points at
    pub default_group: String,
    pub default_members: Vec<String>,
    /// Manual selector listing every endpoint
    pub select_group: String,
    /// Target of AI rules
    pub ai_group: String,
    pub keyword_groups: Vec<KeywordGroupSpec>,
}

impl Default for GroupSettings {
    fn default() -> Self {
        // probe every 15 minutes
        let interval = 900;
        Self {
            default_group: "Default".to_string(),
            default_members: ["Select", "UrlTest", "Fallback", "DIRECT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            select_group: "Select".to_string(),
            ai_group: "AI".to_string(),
            keyword_groups: vec![
                KeywordGroupSpec::new("UrlTest", ProxyGroupType::URLTest, &["自动", "Auto"])
                    .with_options(GroupOptions {
                        interval: Some(interval),
                        tolerance: Some(150),
                        lazy: Some(true),
                        ..Default::default()
                    }),
                KeywordGroupSpec::new("Fallback", ProxyGroupType::Fallback, &["故障", "Fallback"])
                    .with_options(GroupOptions {
                        interval: Some(interval),
                        lazy: Some(true),
                        ..Default::default()
                    })
                    .prioritized(),
                KeywordGroupSpec::new(
                    "AI",
                    ProxyGroupType::Fallback,
                    &["ChatGPT", "OpenAI", "Claude", "Gemini", "Grok"],
                )
                .with_options(GroupOptions {
                    interval: Some(interval),
                    ..Default::default()
                })
                .prioritized(),
            ],
        }
    }
}

/// Everything one overwrite pass needs besides the profile itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OverwriteSettings {
    /// Filled into health-checked groups that do not set their own `url`
    pub health_check_url: String,
    /// Top-level options merged into the profile as-is
    pub global: Option<Mapping>,
    pub dns: ClashDns,
    pub ipv6_source: Ipv6Source,
    pub rule_providers: RuleProviderSettings,
    pub rules: RoutingSettings,
    pub groups: GroupSettings,
    pub regions: Vec<RegionSpec>,
}

impl Default for OverwriteSettings {
    fn default() -> Self {
        Preset::default().settings()
    }
}

impl OverwriteSettings {
    /// Load settings from a `.yaml`/`.yml` or `.toml` file on top of `base`
    pub fn load(path: impl AsRef<Path>, base: Preset) -> Result<Self> {
        let path = path.as_ref();
        let content = file_get(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        info!("Loading settings from {}", path.display());
        match extension.as_str() {
            "toml" => Self::from_toml_str(&content, base),
            "yaml" | "yml" => Self::from_yaml_str(&content, base),
            other => Err(Error::InvalidSettings(format!(
                "Unsupported settings format: {}",
                other
            ))),
        }
    }

    pub fn from_yaml_str(content: &str, base: Preset) -> Result<Self> {
        let overrides: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)?
        };
        Self::with_overrides(overrides, base)
    }

    pub fn from_toml_str(content: &str, base: Preset) -> Result<Self> {
        let overrides: Value = toml::from_str(content)?;
        Self::with_overrides(overrides, base)
    }

    /// Replace top-level keys of the preset with the ones in `overrides`.
    ///
    /// A `preset` key in the overrides selects the base instead of `base`.
    pub fn with_overrides(overrides: Value, base: Preset) -> Result<Self> {
        let mut overrides = match overrides {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::InvalidSettings(
                    "settings must be a mapping".to_string(),
                ))
            }
        };

        let preset = match overrides.remove("preset") {
            Some(Value::String(name)) => name.parse()?,
            Some(_) => {
                return Err(Error::InvalidSettings(
                    "preset must be a string".to_string(),
                ))
            }
            None => base,
        };

        let mut merged = match serde_yaml::to_value(preset.settings())? {
            Value::Mapping(map) => map,
            _ => Mapping::new(),
        };
        merge_mapping(&mut merged, &overrides);

        let settings: OverwriteSettings = serde_yaml::from_value(Value::Mapping(merged))?;
        settings.region_priority()?;
        Ok(settings)
    }

    /// Compile the configured region buckets
    pub fn region_priority(&self) -> Result<RegionPriority> {
        RegionPriority::from_specs(&self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_overwrite_preset() {
        assert_eq!(OverwriteSettings::default(), Preset::Overwrite.settings());
    }

    #[test]
    fn test_default_groups() {
        let groups = GroupSettings::default();
        assert_eq!(groups.default_members, vec!["Select", "UrlTest", "Fallback", "DIRECT"]);
        let names: Vec<&str> = groups.keyword_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["UrlTest", "Fallback", "AI"]);
        assert!(!groups.keyword_groups[0].prioritize_regions);
        assert!(groups.keyword_groups[2].prioritize_regions);
        assert_eq!(groups.keyword_groups[0].options.tolerance, Some(150));
    }

    #[test]
    fn test_yaml_overrides_replace_top_level_keys() {
        let yaml = r#"
health-check-url: "https://cp.cloudflare.com/generate_204"
rules:
  lan-direct: false
  ai-geosites: [openai]
"#;
        let settings = OverwriteSettings::from_yaml_str(yaml, Preset::Overwrite).unwrap();
        assert_eq!(settings.health_check_url, "https://cp.cloudflare.com/generate_204");
        assert!(!settings.rules.lan_direct);
        // missing nested keys fall back to struct defaults
        assert!(settings.rules.china_direct);
        assert_eq!(settings.rules.ai_geosites, vec!["openai"]);
        // untouched keys come from the preset
        assert_eq!(settings.dns, Preset::Overwrite.settings().dns);
    }

    #[test]
    fn test_preset_key_selects_base() {
        let settings = OverwriteSettings::from_yaml_str("preset: script\n", Preset::Overwrite).unwrap();
        assert_eq!(settings, Preset::Script.settings());

        assert!(OverwriteSettings::from_yaml_str("preset: other\n", Preset::Overwrite).is_err());
        assert!(OverwriteSettings::from_yaml_str("- a\n- b\n", Preset::Overwrite).is_err());
    }

    #[test]
    fn test_empty_settings_file_is_the_preset() {
        let settings = OverwriteSettings::from_yaml_str("", Preset::Script).unwrap();
        assert_eq!(settings, Preset::Script.settings());
    }

    #[test]
    fn test_toml_overrides() {
        let toml_content = r#"
ipv6-source = "dns-then-root"

[rule-providers]
enabled = true
base-url = "https://rules.example.com/"
proxy = ["GitHub", "Steam"]

[[groups.keyword-groups]]
name = "Auto"
type = "url-test"
keywords = ["auto"]

[groups.keyword-groups.options]
interval = 300
"#;
        let settings = OverwriteSettings::from_toml_str(toml_content, Preset::Overwrite).unwrap();
        assert_eq!(settings.ipv6_source, Ipv6Source::DnsThenRoot);
        assert!(settings.rule_providers.enabled);
        assert_eq!(settings.rule_providers.proxy, vec!["GitHub", "Steam"]);
        assert_eq!(settings.rule_providers.interval, 86400);
        assert_eq!(settings.groups.keyword_groups.len(), 1);
        assert_eq!(settings.groups.keyword_groups[0].group_type, ProxyGroupType::URLTest);
        assert_eq!(settings.groups.keyword_groups[0].options.interval, Some(300));
        assert_eq!(settings.groups.default_group, "Default");
    }

    #[test]
    fn test_invalid_region_pattern_is_rejected() {
        let yaml = r#"
regions:
  - tag: broken
    patterns: ["(unclosed"]
"#;
        let err = OverwriteSettings::from_yaml_str(yaml, Preset::Overwrite).unwrap_err();
        assert!(matches!(err, Error::Regex(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("settings.yml");
        std::fs::write(&yaml_path, "health-check-url: http://probe.local/\n").unwrap();
        let settings = OverwriteSettings::load(&yaml_path, Preset::Script).unwrap();
        assert_eq!(settings.health_check_url, "http://probe.local/");
        assert!(settings.rule_providers.enabled);

        let ini_path = dir.path().join("settings.ini");
        std::fs::write(&ini_path, "[common]\n").unwrap();
        assert!(OverwriteSettings::load(&ini_path, Preset::Script).is_err());
    }
}
