use crate::types::{MetadataMap, ReportMode};
use regex::Regex;
use std::fmt;

// Debug configuration for line tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    filters: Vec<TraceFilter>,
}

#[derive(Debug, Clone)]
enum TraceFilter {
    Regex(Regex),
    Substring(String),
}

impl TraceFilter {
    fn matches(&self, line: &str) -> bool {
        match self {
            TraceFilter::Regex(regex) => regex.is_match(line),
            TraceFilter::Substring(needle) => line.contains(needle.as_str()),
        }
    }
}

impl DebugConfig {
    /// Filters are compiled once; a pattern that is not a valid regex is
    /// matched as a plain substring instead
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        let filters = filter_patterns
            .into_iter()
            .map(|pattern| match Regex::new(&pattern) {
                Ok(regex) => TraceFilter::Regex(regex),
                Err(_) => TraceFilter::Substring(pattern),
            })
            .collect();

        Self { enabled, filters }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filters: Vec::new(),
        }
    }

    /// Whether a given line should be traced. No filters means every line.
    pub fn traces(&self, line: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if self.filters.is_empty() {
            return true;
        }

        self.filters.iter().any(|filter| filter.matches(line))
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Debug utility to trace a single line through the scanner
pub fn debug_line(stage: &str, line_number: usize, line: &str, debug_config: &DebugConfig) {
    if !debug_config.traces(line) {
        return;
    }

    let preview = if line.chars().count() > 50 {
        format!("{}...", line.chars().take(47).collect::<String>())
    } else {
        line.to_string()
    };
    eprintln!("🔍 [{stage}] line {line_number}: \"{preview}\"");
}

type Predicate = dyn Fn(&MetadataMap) -> bool;

/// A labelled predicate over the header metadata.
///
/// The metadata is passed in on every call; rules never hold onto it.
pub struct Rule {
    label: String,
    predicate: Box<Predicate>,
}

impl Rule {
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&MetadataMap) -> bool + 'static,
    {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn check(&self, metadata: &MetadataMap) -> bool {
        (self.predicate)(metadata)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("label", &self.label).finish()
    }
}

/// Ordered rule sequence. Evaluation always follows insertion order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn with_rule<F>(mut self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&MetadataMap) -> bool + 'static,
    {
        self.push(Rule::new(label, predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::label).collect()
    }

    /// Labels of the rules that fail against `metadata`, in rule order.
    /// `ReportMode::First` stops at the first failure.
    pub fn failing_labels(&self, metadata: &MetadataMap, mode: ReportMode) -> Vec<String> {
        let mut failures = Vec::new();
        for rule in &self.rules {
            if !rule.check(metadata) {
                failures.push(rule.label.clone());
                if mode == ReportMode::First {
                    break;
                }
            }
        }
        failures
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
