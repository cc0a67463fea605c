pub mod analyzer;
pub mod error;
pub mod generator;
pub mod models;
pub mod settings;
pub mod translator;
pub mod utils;

// Re-export the error type
pub use error::{Error, Result};

// Re-export the profile model
pub use models::{Endpoint, Group, ProxyGroupType, ReservedTarget};

// Re-export the rewrite entry points and their settings
pub use generator::{overwrite_config, try_overwrite_config};
pub use settings::{OverwriteSettings, Preset};
