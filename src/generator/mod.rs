pub mod config;
pub mod exports;
pub mod yaml;

// Re-export the building blocks
pub use config::{create_proxy_group, resolve_proxy_nodes, Ipv6Source, RegionPriority};

// Re-export the profile rewrite entry points
pub use exports::{overwrite_config, try_overwrite_config};
