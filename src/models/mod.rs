//! Core data models for the application
//!
//! These are the transient records a single overwrite pass works with:
//! endpoints and groups read out of the incoming profile, and the rule
//! records written back into it.
//!
//! ```rust
//! use clash_overwrite::models::{Endpoint, Group, ReservedTarget};
//!
//! let endpoint = Endpoint::new("HK-1");
//! let group = Group::new("Auto", ["HK-1", "DIRECT"]);
//! assert!(ReservedTarget::is_reserved(&group.members[1]));
//! assert_eq!(endpoint.name, group.members[0]);
//! ```

pub mod proxy;
pub mod proxy_group_config;
pub mod ruleset;

pub use proxy::{endpoints_from_yaml, extract_all_proxies, Endpoint};
pub use proxy_group_config::{groups_from_yaml, Group, ProxyGroupType, ReservedTarget};
pub use ruleset::{RoutingRule, RuleBehavior, RuleFormat, RuleProvider, RuleProviderType};
