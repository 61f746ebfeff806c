use std::io;
use thiserror::Error;

/// Errors raised by the parser.
///
/// Rule failures are not errors; they come back in `ParseOutcome::failures`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("metadata map must be empty at construction (found {len} entries)")]
    NonEmptyMetadata { len: usize },

    #[error("a record handler is required to process the body")]
    MissingHandler,

    #[error("invalid header split pattern '{pattern}': {source}")]
    InvalidSplitPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' has an invalid pattern '{pattern}': {source}")]
    InvalidRulePattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to open {source_name}: {source}")]
    Open {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line} of {source_name}: {source}")]
    Read {
        source_name: String,
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// Configuration errors are raised before any line is read
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ParseError::NonEmptyMetadata { .. }
                | ParseError::MissingHandler
                | ParseError::InvalidSplitPattern { .. }
                | ParseError::InvalidRulePattern { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
