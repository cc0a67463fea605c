//! Built-in settings bundles.
//!
//! `Script` emits remote rule providers and `RULE-SET` rules; `Overwrite`
//! relies on the client's GEOSITE database and also pins global options.

use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::generator::config::dns::Ipv6Source;
use crate::generator::config::region::RegionSpec;
use crate::generator::yaml::clash::ClashDns;
use crate::settings::ruleset::{RoutingSettings, RuleProviderSettings};
use crate::settings::{GroupSettings, OverwriteSettings};

pub const HEALTH_CHECK_URL: &str = "https://www.gstatic.com/generate_204";
pub const RULE_BASE_URL: &str = "https://raw.githubusercontent.com/RanFR/Rules/master/Clash/";
const GEOX_BASE_URL: &str = "https://github.com/MetaCubeX/meta-rules-dat/releases/download/latest/";

const AI_RULE_SETS: [&str; 4] = ["Claude", "Gemini", "Grok", "OpenAI"];

const PROXY_RULE_SETS: [&str; 23] = [
    "Amazon",
    "Cloudflare",
    "DevSites",
    "Docker",
    "Game",
    "GitHub",
    "Google",
    "Intel",
    "JetBrains",
    "JsDelivr",
    "Microsoft",
    "Misc",
    "Mozilla",
    "Overleaf",
    "Scholar",
    "SourceForge",
    "Steam",
    "Telegram",
    "Ubuntu",
    "Wikipedia",
    "X",
    "Yandex",
    "YouTube",
];

const AI_GEOSITES: [&str; 4] = ["anthropic", "openai", "google-gemini", "xai"];

const FAKE_IP_FILTER: [&str; 7] = [
    "*.lan",
    "*.local",
    "+.msftconnecttest.com",
    "+.msftncsi.com",
    "localhost.ptlogin2.qq.com",
    "localhost.sec.qq.com",
    "localhost.work.weixin.qq.com",
];

const DOMESTIC_DOH: [&str; 2] = ["https://dns.alidns.com/dns-query", "https://doh.pub/dns-query"];
const FOREIGN_DOH: [&str; 2] = [
    "https://cloudflare-dns.com/dns-query",
    "https://dns.google/dns-query",
];

/// Which built-in settings bundle to start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Rule-provider flavour
    Script,
    /// GEOSITE flavour with a global options block
    #[default]
    Overwrite,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Script => "script",
            Preset::Overwrite => "overwrite",
        }
    }

    pub fn settings(&self) -> OverwriteSettings {
        match self {
            Preset::Script => script_settings(),
            Preset::Overwrite => overwrite_settings(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "script" => Ok(Preset::Script),
            "overwrite" => Ok(Preset::Overwrite),
            other => Err(Error::InvalidSettings(format!("Unknown preset: {}", other))),
        }
    }
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn insert(map: &mut Mapping, key: &str, value: impl Into<Value>) {
    map.insert(Value::String(key.to_string()), value.into());
}

fn script_dns() -> ClashDns {
    let mut direct = vec!["system".to_string()];
    direct.extend(strings(DOMESTIC_DOH));

    ClashDns {
        enable: Some(true),
        listen: Some("127.0.0.1:5335".to_string()),
        ipv6: Some(false),
        cache_algorithm: Some("arc".to_string()),
        prefer_h3: Some(true),
        enhanced_mode: Some("fake-ip".to_string()),
        direct_nameserver: Some(direct),
        default_nameserver: Some(strings(["tls://223.5.5.5:853", "tls://119.29.29.29:853"])),
        nameserver: Some(strings(FOREIGN_DOH)),
        proxy_server_nameserver: Some(strings(DOMESTIC_DOH)),
        fake_ip_range: Some("198.18.0.1/16".to_string()),
        fake_ip_range_v6: Some("fdfe:dcba:9876::/64".to_string()),
        fake_ip_filter: Some(strings(FAKE_IP_FILTER)),
        ..Default::default()
    }
}

fn overwrite_dns() -> ClashDns {
    ClashDns {
        enable: Some(true),
        listen: Some("127.0.0.1:5335".to_string()),
        ipv6: Some(false),
        cache_algorithm: Some("arc".to_string()),
        respect_rules: Some(true),
        enhanced_mode: Some("fake-ip".to_string()),
        direct_nameserver: Some(strings(DOMESTIC_DOH)),
        default_nameserver: Some(strings(["223.5.5.5", "119.29.29.29"])),
        nameserver: Some(strings(FOREIGN_DOH)),
        proxy_server_nameserver: Some(strings(DOMESTIC_DOH)),
        fake_ip_range: Some("198.18.0.1/16".to_string()),
        fake_ip_filter: Some(strings(FAKE_IP_FILTER)),
        ..Default::default()
    }
}

/// Global client options pinned by the `Overwrite` preset
pub fn global_options() -> Mapping {
    let mut profile = Mapping::new();
    insert(&mut profile, "store-selected", true);
    insert(&mut profile, "store-fake-ip", true);

    let mut geox = Mapping::new();
    insert(&mut geox, "geoip", format!("{}geoip.dat", GEOX_BASE_URL));
    insert(&mut geox, "geosite", format!("{}geosite.dat", GEOX_BASE_URL));
    insert(&mut geox, "mmdb", format!("{}geoip.metadb", GEOX_BASE_URL));
    insert(&mut geox, "asn", format!("{}GeoLite2-ASN.mmdb", GEOX_BASE_URL));

    let mut global = Mapping::new();
    insert(&mut global, "allow-lan", false);
    insert(&mut global, "mode", "rule");
    insert(&mut global, "mixed-port", 7890);
    insert(&mut global, "log-level", "info");
    insert(&mut global, "ipv6", true);
    insert(&mut global, "unified-delay", true);
    insert(&mut global, "profile", profile);
    insert(&mut global, "global-client-fingerprint", "chrome");
    insert(&mut global, "geodata-mode", true);
    insert(&mut global, "geodata-loader", "standard");
    insert(&mut global, "geo-auto-update", true);
    // hours
    insert(&mut global, "geo-update-interval", 24);
    insert(&mut global, "geox-url", geox);
    insert(&mut global, "external-controller", "127.0.0.1:9090");
    insert(&mut global, "external-ui", "ui");
    insert(
        &mut global,
        "external-ui-url",
        "https://github.com/MetaCubeX/metacubexd/archive/refs/heads/gh-pages.zip",
    );
    global
}

fn script_settings() -> OverwriteSettings {
    OverwriteSettings {
        health_check_url: HEALTH_CHECK_URL.to_string(),
        global: None,
        dns: script_dns(),
        ipv6_source: Ipv6Source::DnsThenRoot,
        rule_providers: RuleProviderSettings {
            enabled: true,
            base_url: RULE_BASE_URL.to_string(),
            ai: strings(AI_RULE_SETS),
            proxy: strings(PROXY_RULE_SETS),
            ..Default::default()
        },
        rules: RoutingSettings::default(),
        groups: GroupSettings::default(),
        regions: RegionSpec::defaults(),
    }
}

fn overwrite_settings() -> OverwriteSettings {
    OverwriteSettings {
        health_check_url: HEALTH_CHECK_URL.to_string(),
        global: Some(global_options()),
        dns: overwrite_dns(),
        ipv6_source: Ipv6Source::DnsOnly,
        rule_providers: RuleProviderSettings::default(),
        rules: RoutingSettings {
            ai_geosites: strings(AI_GEOSITES),
            ..Default::default()
        },
        groups: GroupSettings::default(),
        regions: RegionSpec::defaults(),
    }
}
