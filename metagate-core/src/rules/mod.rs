// Main rules module - delegates to semantic sub-modules
// - engine.rs: Rule, RuleSet and debug tracing utilities
// - builtin.rs: declarative checks from config -> Rule
// - validation.rs: human readable report of a parse outcome

pub mod builtin;
pub mod engine;
pub mod validation;

pub use builtin::{build_rule, build_rule_set};
pub use engine::*;
pub use validation::{ValidationIssue, ValidationReport};
