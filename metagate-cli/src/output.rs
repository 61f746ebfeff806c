use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metagate_core::{ParseOutcome, RecordHandler};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes every accepted record to a sink, one per line.
///
/// `RecordHandler::handle` cannot fail, so the first write error is kept and
/// later records are dropped. Call `finish` after the parse to surface it.
pub struct RecordWriter<W: Write> {
    out: W,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: 0,
            error: None,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the sink and report the first write error, if any
    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.written)
    }
}

impl<W: Write> RecordHandler for RecordWriter<W> {
    fn handle(&mut self, record: &str) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{record}") {
            Ok(()) => self.written += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

/// Machine readable result of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: String,
    pub checked_at: DateTime<Utc>,
    pub mode: String,
    pub valid: bool,
    pub failures: Vec<String>,
    pub stopped_at_line: Option<usize>,
    pub records_accepted: usize,
    pub metadata: BTreeMap<String, String>,
}

impl RunSummary {
    pub fn new(input: &str, validate_only: bool, outcome: &ParseOutcome) -> Self {
        Self {
            input: input.to_string(),
            checked_at: Utc::now(),
            mode: if validate_only { "validate" } else { "proceed" }.to_string(),
            valid: outcome.is_valid(),
            failures: outcome.failures.clone(),
            stopped_at_line: outcome.stopped_at,
            records_accepted: outcome.records_accepted,
            // Sorted for stable output
            metadata: outcome
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory for {path}"))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing summary {path}"))?;
        Ok(())
    }
}
