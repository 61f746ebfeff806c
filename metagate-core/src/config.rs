use crate::header::HeaderSplit;
use crate::types::ReportMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_delimiter() -> String {
    "=".to_string()
}

fn default_comment_marker() -> String {
    "#".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// How header lines are split into key and value
    #[serde(default)]
    pub header_split: HeaderSplitConfig,
    /// Lines starting with this marker are skipped everywhere in the file
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
    /// Report every failing rule on the terminating line, or only the first
    #[serde(default)]
    pub report_mode: ReportMode,
    /// Rules to evaluate against the header metadata, in order.
    /// Required: a config without a rule sequence is rejected.
    pub rules: Vec<RuleConfig>,
    /// Trace scanner decisions to stderr
    #[serde(default)]
    pub debug: DebugSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// The pattern is a literal delimiter
    #[default]
    Literal,
    /// The pattern is a regular expression
    Regex,
    /// Literal delimiter with optional whitespace around it
    WhitespaceTolerant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSplitConfig {
    #[serde(default = "default_delimiter")]
    pub pattern: String,
    #[serde(default)]
    pub mode: SplitMode,
}

impl Default for HeaderSplitConfig {
    fn default() -> Self {
        Self {
            pattern: default_delimiter(),
            mode: SplitMode::Literal,
        }
    }
}

impl HeaderSplitConfig {
    pub fn build(&self) -> crate::error::Result<HeaderSplit> {
        match self.mode {
            SplitMode::Literal => HeaderSplit::literal(&self.pattern),
            SplitMode::Regex => HeaderSplit::new(&self.pattern),
            SplitMode::WhitespaceTolerant => HeaderSplit::whitespace_tolerant(&self.pattern),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Label reported when the rule fails
    pub label: String,
    /// What the rule checks
    pub check: RuleCheck,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Declarative metadata checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Key is present
    Exists { key: String },
    /// Key is not present
    Absent { key: String },
    /// Key is present with a value other than the empty string
    NonEmpty { key: String },
    /// Key is present with exactly this value
    Equals { key: String, value: String },
    /// Key is present and its value matches the regex
    Matches { key: String, pattern: String },
    /// Key is present and its value is one of the listed values
    OneOf { key: String, values: Vec<String> },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Only trace lines matching one of these (regex, or substring if invalid)
    #[serde(default)]
    pub filter_patterns: Vec<String>,
}

impl ParsingConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config {path}"))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ParsingConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &RuleConfig> {
        self.rules.iter().filter(|rule| rule.enabled)
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            header_split: HeaderSplitConfig::default(),
            comment_marker: default_comment_marker(),
            report_mode: ReportMode::All,
            rules: Vec::new(),
            debug: DebugSettings::default(),
        }
    }
}
