//! Group generation utilities
//!
//! Expands references to existing groups into the concrete nodes they
//! contain and assembles the generated groups from them.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::generator::yaml::clash::{ClashProxyGroup, GroupOptions};
use crate::models::{extract_all_proxies, Endpoint, Group, ProxyGroupType, ReservedTarget};
use crate::utils::contains_any_keyword;

/// Lookup tables over one profile's endpoints and groups
pub struct NodeResolver<'a> {
    endpoints: HashSet<&'a str>,
    groups: HashMap<&'a str, &'a Group>,
}

impl<'a> NodeResolver<'a> {
    pub fn new(endpoints: &'a [Endpoint], groups: &'a [Group]) -> Self {
        let mut by_name = HashMap::new();
        for group in groups {
            // first definition of a name wins
            by_name.entry(group.name.as_str()).or_insert(group);
        }

        Self {
            endpoints: endpoints.iter().map(|e| e.name.as_str()).collect(),
            groups: by_name,
        }
    }

    /// Expand `reference` into the endpoint names it ultimately contains.
    ///
    /// `visiting` holds the groups on the current path. Each branch gets its
    /// own copy, so a group reached through two separate paths is expanded on
    /// both. A reference back into the current path contributes nothing.
    pub fn resolve(&self, reference: &str, visiting: &HashSet<String>) -> Vec<String> {
        if self.endpoints.contains(reference) {
            return vec![reference.to_string()];
        }

        if visiting.contains(reference) {
            warn!("Circular group reference detected: {}", reference);
            return Vec::new();
        }

        match self.groups.get(reference) {
            Some(group) => {
                let mut path = visiting.clone();
                path.insert(reference.to_string());

                group
                    .members
                    .iter()
                    .flat_map(|member| self.resolve(member, &path))
                    .collect()
            }
            None => {
                if ReservedTarget::is_reserved(reference) {
                    debug!("Skipping built-in target: {}", reference);
                } else {
                    warn!("Proxy not found: {}", reference);
                }
                Vec::new()
            }
        }
    }

    /// Resolve every member of `group`, then dedup and drop reserved targets
    pub fn resolve_group(&self, group: &Group) -> Vec<String> {
        let resolved = group
            .members
            .iter()
            .flat_map(|member| self.resolve(member, &HashSet::new()));
        dedup_nodes(resolved)
    }
}

/// Expand a single reference against the given endpoints and groups
pub fn resolve_proxy_nodes(
    reference: &str,
    endpoints: &[Endpoint],
    groups: &[Group],
    visiting: &HashSet<String>,
) -> Vec<String> {
    NodeResolver::new(endpoints, groups).resolve(reference, visiting)
}

/// Keep the first occurrence of every name and drop reserved targets
pub fn dedup_nodes<I>(nodes: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|n| !ReservedTarget::is_reserved(n))
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// First group whose name contains any keyword (case-insensitive).
///
/// Groups without a name never match.
pub fn find_group_by_keywords<'a, S: AsRef<str>>(
    groups: &'a [Group],
    keywords: &[S],
) -> Option<&'a Group> {
    groups
        .iter()
        .find(|g| !g.name.is_empty() && contains_any_keyword(&g.name, keywords))
}

/// Build a generated group from whichever existing group matches `keywords`
///
/// # Arguments
///
/// * `endpoints` - All endpoints of the profile
/// * `groups` - Groups already defined in the profile
/// * `keywords` - Name fragments used to locate the source group
/// * `group_name` - Name of the generated group
/// * `group_type` - Type of the generated group
/// * `options` - Extra fields copied into the record unchanged
///
/// # Returns
///
/// The new group. Its proxy list falls back to every endpoint when no source
/// group matches or nothing could be resolved from it.
pub fn create_proxy_group<S: AsRef<str>>(
    endpoints: &[Endpoint],
    groups: &[Group],
    keywords: &[S],
    group_name: &str,
    group_type: ProxyGroupType,
    options: GroupOptions,
) -> ClashProxyGroup {
    let mut proxies = match find_group_by_keywords(groups, keywords) {
        Some(source) => {
            info!("Found source group for {}: {}", group_name, source.name);
            let nodes = NodeResolver::new(endpoints, groups).resolve_group(source);
            info!("{} resolved to {} nodes", group_name, nodes.len());
            nodes
        }
        None => {
            info!("No source group for {}, using all nodes", group_name);
            extract_all_proxies(endpoints)
        }
    };

    if proxies.is_empty() {
        warn!(
            "{} has no usable nodes, falling back to all nodes",
            group_name
        );
        proxies = extract_all_proxies(endpoints);
    }

    ClashProxyGroup {
        name: group_name.to_string(),
        group_type,
        proxies,
        options,
    }
}

/// Manual selection group over every endpoint
pub fn create_select_group(endpoints: &[Endpoint], group_name: &str) -> ClashProxyGroup {
    ClashProxyGroup::select(group_name, extract_all_proxies(endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(names: &[&str]) -> Vec<Endpoint> {
        names.iter().map(|n| Endpoint::new(*n)).collect()
    }

    fn resolve(reference: &str, endpoints: &[Endpoint], groups: &[Group]) -> Vec<String> {
        resolve_proxy_nodes(reference, endpoints, groups, &HashSet::new())
    }

    #[test]
    fn test_resolve_endpoint_is_base_case() {
        let nodes = endpoints(&["HK-1"]);
        assert_eq!(resolve("HK-1", &nodes, &[]), vec!["HK-1"]);
    }

    #[test]
    fn test_resolve_nested_groups_in_member_order() {
        let nodes = endpoints(&["HK-1", "SG-1", "US-1"]);
        let groups = vec![
            Group::new("Outer", ["US-1", "Inner", "HK-1"]),
            Group::new("Inner", ["SG-1", "HK-1"]),
        ];

        assert_eq!(
            resolve("Outer", &nodes, &groups),
            vec!["US-1", "SG-1", "HK-1", "HK-1"]
        );
    }

    #[test]
    fn test_resolve_breaks_cycles() {
        let nodes = endpoints(&["HK-1"]);
        let groups = vec![Group::new("A", ["B"]), Group::new("B", ["A", "HK-1"])];

        assert_eq!(resolve("A", &nodes, &groups), vec!["HK-1"]);
        assert_eq!(resolve("B", &nodes, &groups), vec!["HK-1"]);
    }

    #[test]
    fn test_resolve_self_reference() {
        let nodes = endpoints(&["US-1"]);
        let groups = vec![Group::new("Loop", ["Loop", "US-1", "Loop"])];
        assert_eq!(resolve("Loop", &nodes, &groups), vec!["US-1"]);
    }

    #[test]
    fn test_shared_group_resolves_on_each_path() {
        let nodes = endpoints(&["JP-1"]);
        let groups = vec![
            Group::new("Top", ["Left", "Right"]),
            Group::new("Left", ["Shared"]),
            Group::new("Right", ["Shared"]),
            Group::new("Shared", ["JP-1"]),
        ];
        assert_eq!(resolve("Top", &nodes, &groups), vec!["JP-1", "JP-1"]);
    }

    #[test]
    fn test_unknown_and_reserved_references_resolve_to_nothing() {
        let nodes = endpoints(&["HK-1"]);
        assert!(resolve("DIRECT", &nodes, &[]).is_empty());
        assert!(resolve("does-not-exist", &nodes, &[]).is_empty());
    }

    #[test]
    fn test_duplicate_group_names_first_wins() {
        let nodes = endpoints(&["HK-1", "US-1"]);
        let groups = vec![Group::new("Dup", ["HK-1"]), Group::new("Dup", ["US-1"])];
        assert_eq!(resolve("Dup", &nodes, &groups), vec!["HK-1"]);
    }

    #[test]
    fn test_dedup_nodes() {
        let nodes = vec!["A", "DIRECT", "B", "A", "REJECT", "PASS", "B"]
            .into_iter()
            .map(String::from);
        assert_eq!(dedup_nodes(nodes), vec!["A", "B"]);
    }

    #[test]
    fn test_create_proxy_group_from_matching_group() {
        let nodes = endpoints(&["HK-1", "SG-1", "US-1"]);
        let groups = vec![Group::new("Auto", ["HK-1", "SG-1", "US-1"])];

        let group = create_proxy_group(
            &nodes,
            &groups,
            &["Auto"],
            "UrlTest",
            ProxyGroupType::URLTest,
            GroupOptions::health_check("https://www.gstatic.com/generate_204", 900),
        );

        assert_eq!(group.name, "UrlTest");
        assert_eq!(group.group_type, ProxyGroupType::URLTest);
        assert_eq!(group.proxies, vec!["HK-1", "SG-1", "US-1"]);
        assert_eq!(group.options.interval, Some(900));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_and_first_wins() {
        let nodes = endpoints(&["HK-1", "US-1"]);
        let groups = vec![
            Group::new("Manual", ["US-1"]),
            Group::new("♻️ auto select", ["HK-1", "DIRECT", "HK-1"]),
            Group::new("AUTO backup", ["US-1"]),
        ];

        let group = create_proxy_group(
            &nodes,
            &groups,
            &["自动", "Auto"],
            "UrlTest",
            ProxyGroupType::URLTest,
            GroupOptions::default(),
        );
        assert_eq!(group.proxies, vec!["HK-1"]);
    }

    #[test]
    fn test_create_proxy_group_falls_back_to_all_nodes() {
        let nodes = endpoints(&["HK-1", "SG-1", "US-1"]);
        let groups = vec![
            Group::new("Auto", ["HK-1"]),
            Group::new("Fallback only direct", ["DIRECT", "REJECT"]),
        ];

        let unmatched = create_proxy_group(
            &nodes,
            &[Group::new("Auto", ["HK-1"])],
            &["Fallback"],
            "Fallback",
            ProxyGroupType::Fallback,
            GroupOptions::default(),
        );
        assert_eq!(unmatched.proxies, vec!["HK-1", "SG-1", "US-1"]);

        let empty = create_proxy_group(
            &nodes,
            &groups,
            &["Fallback"],
            "Fallback",
            ProxyGroupType::Fallback,
            GroupOptions::default(),
        );
        assert_eq!(empty.proxies, vec!["HK-1", "SG-1", "US-1"]);
    }

    #[test]
    fn test_create_proxy_group_is_deterministic() {
        let nodes = endpoints(&["HK-1", "TW-1", "US-1"]);
        let groups = vec![
            Group::new("AI", ["Sub", "US-1"]),
            Group::new("Sub", ["TW-1", "AI", "HK-1"]),
        ];
        let build = || {
            create_proxy_group(
                &nodes,
                &groups,
                &["ai"],
                "AI",
                ProxyGroupType::Fallback,
                GroupOptions::health_check("https://www.gstatic.com/generate_204", 900),
            )
        };

        assert_eq!(build(), build());
        assert_eq!(build().proxies, vec!["TW-1", "US-1", "HK-1"]);
    }

    #[test]
    fn test_nameless_groups_never_match() {
        let groups = vec![Group::new("", ["HK-1"])];
        assert!(find_group_by_keywords(&groups, &[""]).is_none());
    }

    #[test]
    fn test_create_select_group() {
        let nodes = endpoints(&["HK-1", "US-1"]);
        let group = create_select_group(&nodes, "Select");
        assert_eq!(group.group_type, ProxyGroupType::Select);
        assert_eq!(group.proxies, vec!["HK-1", "US-1"]);
    }
}
