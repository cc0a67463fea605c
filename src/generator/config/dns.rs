use log::info;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::generator::yaml::clash::ClashDns;
use crate::utils::yaml::get_bool;

/// Where the IPv6 switch of the generated DNS section is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ipv6Source {
    /// Only `dns.ipv6` of the incoming profile
    #[default]
    DnsOnly,
    /// `dns.ipv6`, then the top-level `ipv6`
    DnsThenRoot,
}

/// Decide the IPv6 flag for the DNS section; defaults to `false`
pub fn resolve_ipv6(config: &Value, source: Ipv6Source) -> bool {
    if let Some(enabled) = get_bool(config, "dns.ipv6") {
        info!("Using DNS IPv6 setting from profile: {}", enabled);
        return enabled;
    }

    if source == Ipv6Source::DnsThenRoot {
        if let Some(enabled) = get_bool(config, "ipv6") {
            info!("Using global IPv6 setting from profile: {}", enabled);
            return enabled;
        }
    }

    info!("No IPv6 setting in profile, defaulting to false");
    false
}

/// Build the `dns` section from the template with IPv6 taken from the profile
pub fn create_dns_config(config: &Value, template: &ClashDns, source: Ipv6Source) -> ClashDns {
    info!("Generating DNS configuration");
    ClashDns {
        ipv6: Some(resolve_ipv6(config, source)),
        ..template.clone()
    }
}
