use crate::config::ParsingConfig;
use crate::error::{ParseError, Result};
use crate::header::HeaderSplit;
use crate::rules::{build_rule_set, debug_line, DebugConfig, RuleSet};
use crate::source::LineSource;
use crate::types::*;
use std::io::BufRead;

/// Receives each accepted body line, verbatim
pub trait RecordHandler {
    fn handle(&mut self, record: &str);
}

impl<F> RecordHandler for F
where
    F: FnMut(&str),
{
    fn handle(&mut self, record: &str) {
        self(record)
    }
}

/// Single-pass header/body parser with rule-gated continuation.
///
/// Header lines are split into the metadata map until the first empty line.
/// Every body line after that is checked against the rules; the first line
/// with a failing rule stops the whole scan. The metadata map belongs to the
/// parser and accumulates across calls.
pub struct MetadataParser {
    source: Box<dyn LineSource>,
    header_split: HeaderSplit,
    metadata: MetadataMap,
    rules: RuleSet,
    comment_marker: String,
    report_mode: ReportMode,
    debug_config: DebugConfig,
}

impl MetadataParser {
    /// Create a parser. `metadata` must be empty.
    pub fn new(
        source: impl LineSource + 'static,
        header_split: HeaderSplit,
        metadata: MetadataMap,
        rules: RuleSet,
    ) -> Result<Self> {
        if !metadata.is_empty() {
            return Err(ParseError::NonEmptyMetadata {
                len: metadata.len(),
            });
        }

        Ok(Self {
            source: Box::new(source),
            header_split,
            metadata,
            rules,
            comment_marker: "#".to_string(),
            report_mode: ReportMode::All,
            debug_config: DebugConfig::disabled(),
        })
    }

    /// Create a parser whose split pattern, rules and options come from config
    pub fn from_config(source: impl LineSource + 'static, config: &ParsingConfig) -> Result<Self> {
        let header_split = config.header_split.build()?;
        let rules = build_rule_set(config)?;

        Ok(Self::new(source, header_split, MetadataMap::new(), rules)?
            .with_comment_marker(config.comment_marker.clone())
            .with_report_mode(config.report_mode)
            .with_debug_config(DebugConfig::new(
                config.debug.enabled,
                config.debug.filter_patterns.clone(),
            )))
    }

    /// An empty marker disables comment skipping
    pub fn with_comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = marker.into();
        self
    }

    pub fn with_report_mode(mut self, report_mode: ReportMode) -> Self {
        self.report_mode = report_mode;
        self
    }

    pub fn with_debug_config(mut self, debug_config: DebugConfig) -> Self {
        self.debug_config = debug_config;
        self
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn into_metadata(self) -> MetadataMap {
        self.metadata
    }

    /// Forget everything extracted by earlier calls
    pub fn reset_metadata(&mut self) {
        self.metadata.clear();
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Validate the header, then hand every body line to `handler` for as
    /// long as the rules keep passing.
    pub fn process_metadata_and_proceed<F>(&mut self, mut handler: F) -> Result<ParseOutcome>
    where
        F: FnMut(&str),
    {
        self.scan(Some(&mut handler))
    }

    /// Same pass as `process_metadata_and_proceed`, without a handler
    pub fn process_metadata_only(&mut self) -> Result<ParseOutcome> {
        self.scan(None)
    }

    /// Proceed mode for callers whose handler is resolved at runtime.
    /// `None` is rejected before the line source is opened.
    pub fn process_with_handler(
        &mut self,
        handler: Option<&mut dyn RecordHandler>,
    ) -> Result<ParseOutcome> {
        match handler {
            Some(handler) => self.scan(Some(handler)),
            None => Err(ParseError::MissingHandler),
        }
    }

    fn is_comment(&self, line: &str) -> bool {
        !self.comment_marker.is_empty() && line.starts_with(&self.comment_marker)
    }

    fn scan(&mut self, mut handler: Option<&mut dyn RecordHandler>) -> Result<ParseOutcome> {
        let mut reader = self.source.open().map_err(|source| ParseError::Open {
            source_name: self.source.name().to_string(),
            source,
        })?;

        if self.debug_config.enabled {
            eprintln!(
                "📄 Scanning {} ({} rules)",
                self.source.name(),
                self.rules.len()
            );
        }

        let mut phase = ScanPhase::Header;
        let mut failures = Vec::new();
        let mut records_accepted = 0;
        let mut stopped_at = None;

        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            line_number += 1;
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ParseError::Read {
                    source_name: self.source.name().to_string(),
                    line: line_number,
                    source,
                })?;
            if read == 0 {
                break;
            }
            let line = decode_line(&buf);

            if self.is_comment(&line) {
                debug_line("comment", line_number, &line, &self.debug_config);
                continue;
            }

            match phase {
                ScanPhase::Header => {
                    if line.is_empty() {
                        debug_line("boundary", line_number, &line, &self.debug_config);
                        phase = ScanPhase::Body;
                        continue;
                    }

                    match self.header_split.extract_into(&line, &mut self.metadata) {
                        Some(_) => debug_line("header", line_number, &line, &self.debug_config),
                        None => debug_line("skipped", line_number, &line, &self.debug_config),
                    }
                }
                ScanPhase::Body => {
                    let failing = self.rules.failing_labels(&self.metadata, self.report_mode);
                    if !failing.is_empty() {
                        debug_line("rejected", line_number, &line, &self.debug_config);
                        failures = failing;
                        stopped_at = Some(line_number);
                        break;
                    }

                    debug_line("record", line_number, &line, &self.debug_config);
                    records_accepted += 1;
                    if let Some(handler) = handler.as_deref_mut() {
                        handler.handle(&line);
                    }
                }
            }
        }

        if self.debug_config.enabled {
            match stopped_at {
                Some(line_number) => eprintln!(
                    "   ❌ Stopped at line {line_number}: {}",
                    failures.join(", ")
                ),
                None => eprintln!(
                    "   ✅ {} metadata keys, {records_accepted} records accepted",
                    self.metadata.len()
                ),
            }
        }

        Ok(ParseOutcome {
            metadata: self.metadata.clone(),
            failures,
            records_accepted,
            stopped_at,
            body_reached: phase == ScanPhase::Body,
        })
    }
}

/// Strip the `\n` or `\r\n` terminator. Invalid UTF-8 is replaced with
/// U+FFFD rather than failing the read.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
