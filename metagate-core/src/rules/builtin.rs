use crate::config::{ParsingConfig, RuleCheck, RuleConfig};
use crate::error::{ParseError, Result};
use regex::Regex;

use super::engine::{Rule, RuleSet};

/// Build a rule from its declarative config, compiling any regex up front
pub fn build_rule(rule_config: &RuleConfig) -> Result<Rule> {
    let label = rule_config.label.clone();
    let rule = match rule_config.check.clone() {
        RuleCheck::Exists { key } => Rule::new(label, move |m| m.contains_key(&key)),
        RuleCheck::Absent { key } => Rule::new(label, move |m| !m.contains_key(&key)),
        RuleCheck::NonEmpty { key } => {
            Rule::new(label, move |m| m.get(&key).is_some_and(|v| !v.is_empty()))
        }
        RuleCheck::Equals { key, value } => {
            Rule::new(label, move |m| m.get(&key).is_some_and(|v| *v == value))
        }
        RuleCheck::Matches { key, pattern } => {
            let regex = Regex::new(&pattern).map_err(|source| ParseError::InvalidRulePattern {
                rule: rule_config.label.clone(),
                pattern: pattern.clone(),
                source,
            })?;
            Rule::new(label, move |m| m.get(&key).is_some_and(|v| regex.is_match(v)))
        }
        RuleCheck::OneOf { key, values } => Rule::new(label, move |m| {
            m.get(&key).is_some_and(|v| values.iter().any(|allowed| allowed == v))
        }),
    };
    Ok(rule)
}

/// Build the ordered rule set from config, skipping disabled rules
pub fn build_rule_set(config: &ParsingConfig) -> Result<RuleSet> {
    if config.debug.enabled {
        for skipped in config.rules.iter().filter(|rule| !rule.enabled) {
            eprintln!("   ⏭️  Skipping disabled rule: {}", skipped.label);
        }
    }

    config.enabled_rules().map(build_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetadataMap, ReportMode};

    fn rule(label: &str, check: RuleCheck) -> RuleConfig {
        RuleConfig {
            label: label.to_string(),
            check,
            enabled: true,
        }
    }

    fn metadata(pairs: &[(&str, &str)]) -> MetadataMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_each_check_kind() {
        let md = metadata(&[("d", "1234567890"), ("unit", "mm"), ("blank", "")]);
        let key = |k: &str| k.to_string();

        let cases = vec![
            (RuleCheck::Exists { key: key("d") }, true),
            (RuleCheck::Exists { key: key("x") }, false),
            (RuleCheck::Absent { key: key("x") }, true),
            (RuleCheck::Absent { key: key("d") }, false),
            (RuleCheck::NonEmpty { key: key("d") }, true),
            (RuleCheck::NonEmpty { key: key("blank") }, false),
            (RuleCheck::NonEmpty { key: key("x") }, false),
            (RuleCheck::Equals { key: key("unit"), value: key("mm") }, true),
            (RuleCheck::Equals { key: key("unit"), value: key("cm") }, false),
            (
                RuleCheck::Matches { key: key("d"), pattern: key("^[0-9]+$") },
                true,
            ),
            (
                RuleCheck::Matches { key: key("unit"), pattern: key("^[0-9]+$") },
                false,
            ),
            (
                RuleCheck::Matches { key: key("x"), pattern: key(".*") },
                false,
            ),
            (
                RuleCheck::OneOf { key: key("unit"), values: vec![key("cm"), key("mm")] },
                true,
            ),
            (
                RuleCheck::OneOf { key: key("unit"), values: vec![key("in")] },
                false,
            ),
        ];

        for (check, expected) in cases {
            let built = build_rule(&rule("r", check.clone())).unwrap();
            assert_eq!(built.check(&md), expected, "check {check:?}");
        }
    }

    #[test]
    fn test_bad_rule_regex() {
        let err = build_rule(&rule(
            "broken",
            RuleCheck::Matches {
                key: "d".to_string(),
                pattern: "[".to_string(),
            },
        ))
        .unwrap_err();
        match err {
            ParseError::InvalidRulePattern { rule, .. } => assert_eq!(rule, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rule_set_skips_disabled_and_keeps_order() {
        let mut config = ParsingConfig::default();
        config.rules = vec![
            rule("second", RuleCheck::Exists { key: "b".to_string() }),
            RuleConfig {
                enabled: false,
                ..rule("off", RuleCheck::Exists { key: "z".to_string() })
            },
            rule("first", RuleCheck::Exists { key: "a".to_string() }),
        ];

        let rules = build_rule_set(&config).unwrap();
        assert_eq!(rules.labels(), vec!["second", "first"]);
        assert_eq!(
            rules.failing_labels(&MetadataMap::new(), ReportMode::All),
            vec!["second".to_string(), "first".to_string()]
        );
    }
}
