pub mod clash;

pub use clash::{overwrite_config, process_proxy_groups, try_overwrite_config, validate_config};
