// All parsing functionality is in metagate-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod output;

// Re-export core types for convenience
pub use metagate_core::*;

// Re-export CLI utilities
pub use output::{RecordWriter, RunSummary};
