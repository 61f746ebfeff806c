// Header key/value splitting
//
// A header line is split at the first match of the configured pattern that
// leaves a non-empty key in front of it. Everything after that match is the
// value, delimiter lookalikes included.

use crate::error::{ParseError, Result};
use crate::types::MetadataMap;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct HeaderSplit {
    regex: Regex,
}

const DEFAULT_DELIMITER: &str = "=";

/// Shortest non-empty key, then the pattern, then everything else
fn anchored(pattern: &str) -> String {
    format!(r"^(?P<key>.+?)(?:{pattern})(?P<value>.*)$")
}

impl HeaderSplit {
    /// Split at an arbitrary regular expression
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&anchored(pattern)).map_err(|source| ParseError::InvalidSplitPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex })
    }

    /// Split at a literal delimiter (regex metacharacters are escaped)
    pub fn literal(delimiter: &str) -> Result<Self> {
        Self::new(&regex::escape(delimiter))
    }

    /// Split at a literal delimiter with optional whitespace on either side,
    /// so `key = value` yields `("key", "value")`
    pub fn whitespace_tolerant(delimiter: &str) -> Result<Self> {
        Self::new(&format!(r"\s*{}\s*", regex::escape(delimiter)))
    }

    /// Returns `None` when the line has no usable split point
    pub fn split(&self, line: &str) -> Option<(String, String)> {
        let captures = self.regex.captures(line)?;
        let key = captures.name("key")?.as_str();
        let value = captures.name("value").map_or("", |m| m.as_str());
        Some((key.to_string(), value.to_string()))
    }

    /// Split a header line into `metadata`, overwriting an earlier value for
    /// the same key. Returns the key that was stored, if any.
    pub fn extract_into(&self, line: &str, metadata: &mut MetadataMap) -> Option<String> {
        let (key, value) = self.split(line)?;
        metadata.insert(key.clone(), value);
        Some(key)
    }
}

impl Default for HeaderSplit {
    fn default() -> Self {
        Self {
            regex: Regex::new(&anchored(&regex::escape(DEFAULT_DELIMITER)))
                .expect("default split pattern is a valid regex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_first_delimiter() {
        let split = HeaderSplit::default();
        assert_eq!(
            split.split("url=http://host/?a=b"),
            Some(("url".to_string(), "http://host/?a=b".to_string()))
        );
    }

    #[test]
    fn test_key_must_be_non_empty() {
        let split = HeaderSplit::default();
        // The leading '=' cannot end an empty key, so the second one is used
        assert_eq!(
            split.split("==x"),
            Some(("=".to_string(), "x".to_string()))
        );
        assert_eq!(split.split("="), None);
    }

    #[test]
    fn test_no_match_is_none() {
        let split = HeaderSplit::default();
        assert_eq!(split.split("just some words"), None);
        assert_eq!(split.split("   "), None);
    }

    #[test]
    fn test_default_matches_literal_equals() {
        let default = HeaderSplit::default();
        let literal = HeaderSplit::literal("=").unwrap();
        assert_eq!(default.regex.as_str(), literal.regex.as_str());
        for line in ["a=b", "==x", "url=http://h/?a=b", "no delimiter", "k="] {
            assert_eq!(default.split(line), literal.split(line));
        }
    }

    #[test]
    fn test_empty_value_allowed() {
        let split = HeaderSplit::default();
        assert_eq!(split.split("k="), Some(("k".to_string(), String::new())));
    }

    #[test]
    fn test_whitespace_tolerant() {
        let split = HeaderSplit::whitespace_tolerant(":").unwrap();
        assert_eq!(
            split.split("title :  Monthly report"),
            Some(("title".to_string(), "Monthly report".to_string()))
        );
        // Plain split keeps the padding
        let plain = HeaderSplit::literal(":").unwrap();
        assert_eq!(
            plain.split("title : x"),
            Some(("title ".to_string(), " x".to_string()))
        );
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let split = HeaderSplit::literal("|").unwrap();
        assert_eq!(
            split.split("a|b|c"),
            Some(("a".to_string(), "b|c".to_string()))
        );
    }

    #[test]
    fn test_regex_alternation() {
        let split = HeaderSplit::new("=|:").unwrap();
        assert_eq!(split.split("a:b=c"), Some(("a".to_string(), "b=c".to_string())));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = HeaderSplit::new("(").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSplitPattern { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_extract_into_overwrites() {
        let split = HeaderSplit::default();
        let mut metadata = MetadataMap::new();
        split.extract_into("a=1", &mut metadata);
        split.extract_into("a=2", &mut metadata);
        assert_eq!(metadata.get("a").map(String::as_str), Some("2"));
        assert_eq!(split.extract_into("nothing here", &mut metadata), None);
        assert_eq!(metadata.len(), 1);
    }
}
