use crate::types::ParseOutcome;

// ValidationReport - human readable view of a parse outcome
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub metadata_keys: usize,
    pub records_accepted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    RuleFailed { label: String, line: Option<usize> },
    NoBody,
}

impl ValidationReport {
    pub fn from_outcome(outcome: &ParseOutcome) -> Self {
        let mut issues: Vec<ValidationIssue> = outcome
            .failures
            .iter()
            .map(|label| ValidationIssue::RuleFailed {
                label: label.clone(),
                line: outcome.stopped_at,
            })
            .collect();

        if !outcome.body_reached {
            issues.push(ValidationIssue::NoBody);
        }

        Self {
            issues,
            metadata_keys: outcome.metadata.len(),
            records_accepted: outcome.records_accepted,
        }
    }

    /// Only rule failures make a file invalid; a missing body is a warning
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::RuleFailed { .. }))
    }

    /// Print validation report to console
    pub fn print(&self) {
        eprintln!("   📊 Validation Report:");
        eprintln!("      🔑 Metadata keys: {}", self.metadata_keys);
        eprintln!("      📄 Records accepted: {}", self.records_accepted);

        if self.issues.is_empty() {
            eprintln!("      ✅ All rules passed!");
            return;
        }

        eprintln!("      ⚠️  Issues detected:");
        for issue in &self.issues {
            match issue {
                ValidationIssue::RuleFailed {
                    label,
                    line: Some(line),
                } => {
                    eprintln!("         ❌ Rule failed: \"{label}\" (stopped at line {line})");
                }
                ValidationIssue::RuleFailed { label, line: None } => {
                    eprintln!("         ❌ Rule failed: \"{label}\"");
                }
                ValidationIssue::NoBody => {
                    eprintln!("         🤔 No header/body boundary found, rules were never evaluated");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetadataMap;

    fn outcome(failures: &[&str], stopped_at: Option<usize>, body_reached: bool) -> ParseOutcome {
        ParseOutcome {
            metadata: MetadataMap::from([("a".to_string(), "1".to_string())]),
            failures: failures.iter().map(|s| s.to_string()).collect(),
            records_accepted: 0,
            stopped_at,
            body_reached,
        }
    }

    #[test]
    fn test_report_from_failures() {
        let report = ValidationReport::from_outcome(&outcome(&["x", "y"], Some(5), true));
        assert!(!report.is_valid());
        assert_eq!(report.metadata_keys, 1);
        assert_eq!(
            report.issues,
            vec![
                ValidationIssue::RuleFailed {
                    label: "x".to_string(),
                    line: Some(5)
                },
                ValidationIssue::RuleFailed {
                    label: "y".to_string(),
                    line: Some(5)
                },
            ]
        );
    }

    #[test]
    fn test_missing_body_is_only_a_warning() {
        let report = ValidationReport::from_outcome(&outcome(&[], None, false));
        assert!(report.is_valid());
        assert_eq!(report.issues, vec![ValidationIssue::NoBody]);
    }
}
