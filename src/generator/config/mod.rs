pub mod dns;
pub mod group;
pub mod region;
pub mod ruleconvert;

pub use dns::{create_dns_config, resolve_ipv6, Ipv6Source};
pub use group::{
    create_proxy_group, create_select_group, dedup_nodes, find_group_by_keywords,
    resolve_proxy_nodes, NodeResolver,
};
pub use region::{RegionPriority, RegionSpec};
pub use ruleconvert::{create_all_rule_providers, create_rule_provider, create_routing_rules};
