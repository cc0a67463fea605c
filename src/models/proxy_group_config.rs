use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

/// Type of proxy group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyGroupType {
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "url-test")]
    URLTest,
    #[serde(rename = "fallback")]
    Fallback,
    #[serde(rename = "load-balance")]
    LoadBalance,
    #[serde(rename = "relay")]
    Relay,
}

impl ProxyGroupType {
    /// Get string representation of the proxy group type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "select",
            ProxyGroupType::URLTest => "url-test",
            ProxyGroupType::LoadBalance => "load-balance",
            ProxyGroupType::Fallback => "fallback",
            ProxyGroupType::Relay => "relay",
        }
    }
}

impl fmt::Display for ProxyGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named group as it appears in the incoming profile.
///
/// Members may name endpoints, other groups or reserved targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub members: Vec<String>,
}

impl Group {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a group from a `proxy-groups` entry.
    ///
    /// Missing names become empty strings, non-string members are dropped.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        let map = value.as_mapping()?;
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let members = map
            .get("proxies")
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { name, members })
    }
}

/// Collect every group from a `proxy-groups` sequence
pub fn groups_from_yaml(groups: &[Value]) -> Vec<Group> {
    groups.iter().filter_map(Group::from_yaml).collect()
}

/// Built-in pseudo targets that are never real nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedTarget {
    Direct,
    Reject,
    Pass,
}

impl ReservedTarget {
    pub const ALL: [ReservedTarget; 3] = [
        ReservedTarget::Direct,
        ReservedTarget::Reject,
        ReservedTarget::Pass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservedTarget::Direct => "DIRECT",
            ReservedTarget::Reject => "REJECT",
            ReservedTarget::Pass => "PASS",
        }
    }

    /// Look up a reserved target by its exact name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn is_reserved(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl fmt::Display for ReservedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_type_serializes_as_clash_keyword() {
        let yaml = serde_yaml::to_string(&ProxyGroupType::URLTest).unwrap();
        assert_eq!(yaml.trim(), "url-test");
        let parsed: ProxyGroupType = serde_yaml::from_str("load-balance").unwrap();
        assert_eq!(parsed, ProxyGroupType::LoadBalance);
    }

    #[test]
    fn test_group_from_yaml() {
        let value: Value = serde_yaml::from_str(
            "{name: Auto, type: url-test, proxies: [HK-1, DIRECT, 7, Other]}",
        )
        .unwrap();
        let group = Group::from_yaml(&value).unwrap();
        assert_eq!(group.name, "Auto");
        assert_eq!(group.members, vec!["HK-1", "DIRECT", "Other"]);

        let nameless: Value = serde_yaml::from_str("{type: select, use: [provider]}").unwrap();
        let group = Group::from_yaml(&nameless).unwrap();
        assert!(group.name.is_empty());
        assert!(group.members.is_empty());
    }

    #[test]
    fn test_reserved_targets() {
        assert_eq!(ReservedTarget::from_name("DIRECT"), Some(ReservedTarget::Direct));
        assert_eq!(ReservedTarget::from_name("PASS"), Some(ReservedTarget::Pass));
        assert!(ReservedTarget::is_reserved("REJECT"));
        assert!(!ReservedTarget::is_reserved("direct"));
        assert!(!ReservedTarget::is_reserved("HK-1"));
    }
}
