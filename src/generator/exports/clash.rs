use log::{error, info, warn};
use serde_yaml::{Mapping, Value};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::generator::config::dns::create_dns_config;
use crate::generator::config::group::{create_proxy_group, create_select_group};
use crate::generator::config::region::RegionPriority;
use crate::generator::config::ruleconvert::{create_all_rule_providers, create_routing_rules};
use crate::generator::yaml::clash::ClashProxyGroup;
use crate::models::{endpoints_from_yaml, groups_from_yaml, Endpoint, Group, ProxyGroupType};
use crate::settings::{KeywordGroupSpec, OverwriteSettings};
use crate::utils::yaml::{get_sequence, merge_mapping, set_key};

/// Check the profile can be rewritten and return its endpoints
pub fn validate_config(config: &Value) -> Result<Vec<Endpoint>> {
    if !config.is_mapping() {
        return Err(Error::InvalidConfig("profile is not a mapping".to_string()));
    }

    let proxies = get_sequence(config, "proxies")
        .ok_or_else(|| Error::InvalidConfig("missing proxies list".to_string()))?;
    let endpoints = endpoints_from_yaml(proxies);
    if endpoints.is_empty() {
        return Err(Error::InvalidConfig("proxies list is empty".to_string()));
    }

    Ok(endpoints)
}

fn needs_health_check(group_type: ProxyGroupType) -> bool {
    matches!(
        group_type,
        ProxyGroupType::URLTest | ProxyGroupType::Fallback | ProxyGroupType::LoadBalance
    )
}

fn create_keyword_group(
    spec: &KeywordGroupSpec,
    endpoints: &[Endpoint],
    groups: &[Group],
    health_check_url: &str,
    regions: &RegionPriority,
) -> ClashProxyGroup {
    let mut options = spec.options.clone();
    if options.url.is_none() && needs_health_check(spec.group_type) {
        options.url = Some(health_check_url.to_string());
    }

    let mut group = create_proxy_group(
        endpoints,
        groups,
        &spec.keywords,
        &spec.name,
        spec.group_type,
        options,
    );
    if spec.prioritize_regions {
        group.proxies = regions.prioritize(&group.proxies);
    }
    group
}

/// Build the replacement `proxy-groups` list
///
/// The default selector comes first, then the manual selector over every
/// endpoint, then one group per keyword spec in settings order.
pub fn process_proxy_groups(
    endpoints: &[Endpoint],
    groups: &[Group],
    settings: &OverwriteSettings,
    regions: &RegionPriority,
) -> Vec<ClashProxyGroup> {
    info!("Processing proxy groups");
    let layout = &settings.groups;

    let mut result = vec![
        ClashProxyGroup::select(&layout.default_group, layout.default_members.clone()),
        create_select_group(endpoints, &layout.select_group),
    ];

    for spec in &layout.keyword_groups {
        info!("Creating group {}", spec.name);
        result.push(create_keyword_group(
            spec,
            endpoints,
            groups,
            &settings.health_check_url,
            regions,
        ));
    }

    result
}

/// Rewrite `config` and return the new profile.
///
/// The input is never modified; on error nothing partial is returned.
pub fn try_overwrite_config(
    config: &Value,
    profile_name: &str,
    settings: &OverwriteSettings,
) -> Result<Value> {
    let endpoints = validate_config(config)?;
    let groups = get_sequence(config, "proxy-groups")
        .map(|seq| groups_from_yaml(seq))
        .unwrap_or_default();
    let regions = settings.region_priority()?;

    info!("Processing profile: {}", profile_name);
    info!("Region priority: {}", regions.tags().join(" > "));

    let mut output: Mapping = match config {
        Value::Mapping(map) => map.clone(),
        _ => return Err(Error::InvalidConfig("profile is not a mapping".to_string())),
    };

    if let Some(global) = &settings.global {
        info!("Applying global options");
        merge_mapping(&mut output, global);
    }

    let dns = create_dns_config(config, &settings.dns, settings.ipv6_source);
    set_key(&mut output, "dns", serde_yaml::to_value(dns)?);

    // left untouched when disabled; replaced wholesale (even by nothing) otherwise
    if settings.rule_providers.enabled {
        let providers = create_all_rule_providers(&settings.rule_providers)?;
        set_key(&mut output, "rule-providers", Value::Mapping(providers));
    }

    let rules: Vec<Value> = create_routing_rules(
        &settings.rule_providers,
        &settings.rules,
        &settings.groups.ai_group,
        &settings.groups.default_group,
    )
    .iter()
    .map(|rule| Value::String(rule.to_string()))
    .collect();
    set_key(&mut output, "rules", Value::Sequence(rules));

    let proxy_groups = process_proxy_groups(&endpoints, &groups, settings, &regions);
    set_key(&mut output, "proxy-groups", serde_yaml::to_value(proxy_groups)?);

    Ok(Value::Mapping(output))
}

/// Rewrite `config`, handing back the original profile if anything fails
pub fn overwrite_config(config: Value, profile_name: &str, settings: &OverwriteSettings) -> Value {
    let started = Instant::now();

    match try_overwrite_config(&config, profile_name, settings) {
        Ok(result) => {
            info!("Profile processed");
            info!("Execution time: {}ms", started.elapsed().as_millis());
            result
        }
        Err(e) => {
            error!("Failed to process profile {}: {}", profile_name, e);
            warn!("Returning the original profile unchanged");
            config
        }
    }
}
