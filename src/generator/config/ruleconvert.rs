//! Rule-provider and routing-rule generation

use log::info;
use serde_yaml::{Mapping, Value};

use crate::error::Result;
use crate::models::{ReservedTarget, RoutingRule, RuleProvider, RuleProviderType};
use crate::settings::ruleset::{RoutingSettings, RuleProviderSettings};

/// Build the provider record for one rule set
pub fn create_rule_provider(name: &str, settings: &RuleProviderSettings) -> RuleProvider {
    let file_name = format!("{}.{}", name, settings.format.extension());
    let url = match settings.provider_type {
        RuleProviderType::Http => Some(format!("{}{}", settings.base_url, file_name)),
        RuleProviderType::File => None,
    };

    RuleProvider {
        provider_type: settings.provider_type,
        format: settings.format,
        interval: settings.interval,
        behavior: settings.behavior,
        url,
        path: format!("{}{}", settings.path_prefix, file_name),
    }
}

/// Names of every configured rule set: direct, then AI, then proxy
pub fn rule_set_names(settings: &RuleProviderSettings) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for name in settings
        .direct
        .iter()
        .chain(&settings.ai)
        .chain(&settings.proxy)
    {
        if !names.contains(&name.as_str()) {
            names.push(name.as_str());
        }
    }
    names
}

/// Build the whole `rule-providers` mapping, keyed by rule set name
pub fn create_all_rule_providers(settings: &RuleProviderSettings) -> Result<Mapping> {
    let mut providers = Mapping::new();
    for name in rule_set_names(settings) {
        let provider = create_rule_provider(name, settings);
        providers.insert(
            Value::String(name.to_string()),
            serde_yaml::to_value(provider)?,
        );
    }
    info!("Generated {} rule providers", providers.len());
    Ok(providers)
}

/// Build the ordered `rules` list.
///
/// Local and mainland traffic goes direct first, then the rule sets, and
/// everything else ends at `default_target`.
pub fn create_routing_rules(
    providers: &RuleProviderSettings,
    routing: &RoutingSettings,
    ai_target: &str,
    default_target: &str,
) -> Vec<RoutingRule> {
    let direct = ReservedTarget::Direct.as_str();
    let mut rules = Vec::new();

    if routing.lan_direct {
        rules.push(RoutingRule::geoip("private", direct, true));
    }

    if routing.china_direct {
        rules.push(RoutingRule::geosite("cn", direct));
        rules.push(RoutingRule::geoip("cn", direct, false));
    }

    if providers.enabled {
        rules.extend(
            providers
                .direct
                .iter()
                .map(|name| RoutingRule::rule_set(name.as_str(), direct)),
        );
    }

    rules.extend(
        routing
            .ai_geosites
            .iter()
            .map(|code| RoutingRule::geosite(code.as_str(), ai_target)),
    );

    if providers.enabled {
        rules.extend(
            providers
                .ai
                .iter()
                .map(|name| RoutingRule::rule_set(name.as_str(), ai_target)),
        );
        rules.extend(
            providers
                .proxy
                .iter()
                .map(|name| RoutingRule::rule_set(name.as_str(), default_target)),
        );
    }

    rules.push(RoutingRule::matches_all(default_target));

    info!("Generated {} routing rules", rules.len());
    rules
}
