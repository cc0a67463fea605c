use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a rule provider gets its content from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleProviderType {
    #[default]
    Http,
    File,
}

/// Encoding of a rule provider's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFormat {
    #[default]
    Yaml,
    Text,
    Mrs,
}

impl RuleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RuleFormat::Yaml => "yaml",
            RuleFormat::Text => "list",
            RuleFormat::Mrs => "mrs",
        }
    }
}

/// How the routing engine interprets a provider's entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleBehavior {
    Domain,
    Ipcidr,
    #[default]
    Classical,
}

/// A single `rule-providers` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProvider {
    #[serde(rename = "type")]
    pub provider_type: RuleProviderType,
    pub format: RuleFormat,
    pub interval: u32,
    pub behavior: RuleBehavior,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub path: String,
}

/// One line of the `rules` section.
///
/// Order matters downstream: the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingRule {
    RuleSet {
        name: String,
        target: String,
    },
    GeoIp {
        code: String,
        target: String,
        no_resolve: bool,
    },
    GeoSite {
        code: String,
        target: String,
    },
    Match {
        target: String,
    },
}

impl RoutingRule {
    pub fn rule_set(name: impl Into<String>, target: impl Into<String>) -> Self {
        RoutingRule::RuleSet {
            name: name.into(),
            target: target.into(),
        }
    }

    pub fn geoip(code: impl Into<String>, target: impl Into<String>, no_resolve: bool) -> Self {
        RoutingRule::GeoIp {
            code: code.into(),
            target: target.into(),
            no_resolve,
        }
    }

    pub fn geosite(code: impl Into<String>, target: impl Into<String>) -> Self {
        RoutingRule::GeoSite {
            code: code.into(),
            target: target.into(),
        }
    }

    pub fn matches_all(target: impl Into<String>) -> Self {
        RoutingRule::Match {
            target: target.into(),
        }
    }
}

impl fmt::Display for RoutingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingRule::RuleSet { name, target } => write!(f, "RULE-SET,{},{}", name, target),
            RoutingRule::GeoIp {
                code,
                target,
                no_resolve,
            } => {
                write!(f, "GEOIP,{},{}", code, target)?;
                if *no_resolve {
                    f.write_str(",no-resolve")?;
                }
                Ok(())
            }
            RoutingRule::GeoSite { code, target } => write!(f, "GEOSITE,{},{}", code, target),
            RoutingRule::Match { target } => write!(f, "MATCH,{}", target),
        }
    }
}
