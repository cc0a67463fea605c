//! Region-based ordering of node names

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::ascii_word_pattern;

lazy_static! {
    static ref HONG_KONG_PATTERNS: Vec<String> = vec![
        "香港".to_string(),
        r"(?i)hong\s*kong".to_string(),
        ascii_word_pattern("HK", true),
        ascii_word_pattern("HKG", true),
        r"(?i)\[\s*HK\s*\]".to_string(),
        r"(?i)\(\s*HK\s*\)".to_string(),
    ];
    static ref TAIWAN_PATTERNS: Vec<String> = vec![
        "台湾|台灣".to_string(),
        r"(?i)tai\s*wan".to_string(),
        ascii_word_pattern("TW", true),
        ascii_word_pattern("TWN", true),
        ascii_word_pattern("TPE", true),
        r"(?i)taipei".to_string(),
    ];
}

/// Pattern source for one priority bucket, as written in settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub tag: String,
    pub patterns: Vec<String>,
}

impl RegionSpec {
    pub fn new(tag: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            patterns,
        }
    }

    /// Hong Kong, then Taiwan
    pub fn defaults() -> Vec<RegionSpec> {
        vec![
            RegionSpec::new("HK", HONG_KONG_PATTERNS.clone()),
            RegionSpec::new("TW", TAIWAN_PATTERNS.clone()),
        ]
    }
}

#[derive(Debug, Clone)]
struct RegionBucket {
    tag: String,
    patterns: Vec<Regex>,
}

impl RegionBucket {
    fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }
}

/// Ordered region buckets used to move preferred nodes to the front
#[derive(Debug, Clone)]
pub struct RegionPriority {
    buckets: Vec<RegionBucket>,
}

impl RegionPriority {
    /// Compile bucket patterns. Bucket order is priority order.
    pub fn from_specs(specs: &[RegionSpec]) -> Result<Self> {
        let buckets = specs
            .iter()
            .map(|spec| {
                let patterns = spec
                    .patterns
                    .iter()
                    .map(|p| Regex::new(p))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(RegionBucket {
                    tag: spec.tag.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { buckets })
    }

    /// Tags of the configured buckets, highest priority first
    pub fn tags(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.tag.as_str()).collect()
    }

    /// Index of the first bucket matching `name`, if any
    pub fn classify(&self, name: &str) -> Option<usize> {
        self.buckets.iter().position(|b| b.matches(name))
    }

    /// Stable partition of `names` by bucket.
    ///
    /// Matched names come first in bucket order, unmatched names last; the
    /// relative order inside each bucket is kept and nothing is dropped.
    pub fn prioritize(&self, names: &[String]) -> Vec<String> {
        let mut partitions: Vec<Vec<String>> = vec![Vec::new(); self.buckets.len() + 1];
        for name in names {
            let slot = self.classify(name).unwrap_or(self.buckets.len());
            partitions[slot].push(name.clone());
        }
        partitions.into_iter().flatten().collect()
    }
}

impl Default for RegionPriority {
    fn default() -> Self {
        // the built-in patterns are known to compile
        Self::from_specs(&RegionSpec::defaults()).unwrap_or(Self {
            buckets: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_buckets_compile() {
        let priority = RegionPriority::default();
        assert_eq!(priority.tags(), vec!["HK", "TW"]);
    }

    #[test]
    fn test_prioritize_hong_kong_then_taiwan() {
        let priority = RegionPriority::default();
        let input = names(&[
            "🇺🇸 US 01",
            "🇹🇼 台湾 01",
            "🇭🇰 香港 01",
            "Japan Tokyo",
            "Hong Kong 02",
            "Taipei-3",
            "[HK] 03",
        ]);

        assert_eq!(
            priority.prioritize(&input),
            names(&[
                "🇭🇰 香港 01",
                "Hong Kong 02",
                "[HK] 03",
                "🇹🇼 台湾 01",
                "Taipei-3",
                "🇺🇸 US 01",
                "Japan Tokyo",
            ])
        );
    }

    #[test]
    fn test_word_boundaries() {
        let priority = RegionPriority::default();
        assert_eq!(priority.classify("hk-01"), Some(0));
        assert_eq!(priority.classify("HKG relay"), Some(0));
        assert_eq!(priority.classify("TWN 2"), Some(1));
        assert_eq!(priority.classify("HK01"), None);
        assert_eq!(priority.classify("Network"), None);
        assert_eq!(priority.classify("STW"), None);
    }

    #[test]
    fn test_first_matching_bucket_wins() {
        let priority = RegionPriority::default();
        assert_eq!(priority.classify("HK-TW relay"), Some(0));
    }

    #[test]
    fn test_prioritize_is_a_stable_partition() {
        let priority = RegionPriority::default();
        let input = names(&["B", "HK 2", "A", "TW 1", "HK 1", "A", "TW 1"]);
        let output = priority.prioritize(&input);

        assert_eq!(output.len(), input.len());
        let mut sorted_in = input.clone();
        let mut sorted_out = output.clone();
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);

        assert_eq!(output, names(&["HK 2", "HK 1", "TW 1", "TW 1", "B", "A", "A"]));
    }

    #[test]
    fn test_custom_buckets_and_invalid_patterns() {
        let specs = vec![RegionSpec::new("JP", vec!["(?i)japan|日本".to_string()])];
        let priority = RegionPriority::from_specs(&specs).unwrap();
        assert_eq!(
            priority.prioritize(&names(&["US", "Japan 1", "日本 2"])),
            names(&["Japan 1", "日本 2", "US"])
        );

        let broken = vec![RegionSpec::new("X", vec!["(unclosed".to_string()])];
        assert!(RegionPriority::from_specs(&broken).is_err());
    }

    #[test]
    fn test_empty_priority_keeps_order() {
        let priority = RegionPriority::from_specs(&[]).unwrap();
        let input = names(&["HK", "US"]);
        assert_eq!(priority.prioritize(&input), input);
    }
}
