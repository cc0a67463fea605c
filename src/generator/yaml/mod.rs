pub mod clash;

pub use clash::{ClashDns, ClashProxyGroup, GroupOptions};
