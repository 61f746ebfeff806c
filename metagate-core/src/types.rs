use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header metadata extracted from a file: key -> value, last write wins.
pub type MetadataMap = HashMap<String, String>;

/// How rule failures on the terminating body line are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Every rule label that failed on the terminating line, in rule order
    #[default]
    All,
    /// Only the first failing rule label
    First,
}

/// Where the scanner currently sits in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Header,
    Body,
}

/// Result of one parse call.
///
/// `failures` is the exception info: empty means every body line passed the
/// rules; otherwise it names the rule(s) that failed on the line where the
/// scan stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub metadata: MetadataMap,
    pub failures: Vec<String>,
    /// Body lines that passed every rule (handler invocations in proceed mode)
    pub records_accepted: usize,
    /// 1-based line number where a rule failure stopped the scan
    pub stopped_at: Option<usize>,
    /// Whether the header/body boundary was found
    pub body_reached: bool,
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Metadata keys in sorted order, for stable display
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.metadata.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
