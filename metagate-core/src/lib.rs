// Metagate Core Library
//
// Single-pass parsing of header/body text files: header lines become a
// key/value metadata map, the body is only handed on while the metadata
// satisfies an ordered list of rules.

pub mod config;
pub mod error;
pub mod header;
pub mod processor;
pub mod rules;
pub mod source;
pub mod types;

// Re-export main types and functions for easy use
pub use types::*;
pub use config::{HeaderSplitConfig, ParsingConfig, RuleCheck, RuleConfig, SplitMode};
pub use error::ParseError;
pub use header::HeaderSplit;
pub use processor::{MetadataParser, RecordHandler};
pub use rules::{DebugConfig, Rule, RuleSet, ValidationIssue, ValidationReport};
pub use source::{FileSource, LineSource, TextSource};
