use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use metagate::{
    FileSource, MetadataParser, ParsingConfig, RecordWriter, ReportMode, RuleCheck, RuleConfig,
    RunSummary, SplitMode, ValidationReport,
};

#[derive(Parser)]
#[command(name = "metagate")]
#[command(about = "Validate the header of a data file and stream its records")]
struct Args {
    /// Path to the data file to process
    #[arg(short, long, required_unless_present = "show_configs")]
    input: Option<String>,

    /// Path to config file with split pattern and rules (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Header split pattern (overrides config)
    #[arg(short, long)]
    split: Option<String>,

    /// How to read the split pattern: literal, regex, or whitespace_tolerant
    #[arg(long)]
    split_mode: Option<String>,

    /// Require a header key to exist (repeatable, appended after config rules)
    #[arg(short, long = "require", value_name = "KEY")]
    require: Vec<String>,

    /// Report all failing rules or only the first: all or first
    #[arg(long)]
    report_mode: Option<String>,

    /// Only validate the header, do not emit records
    #[arg(long)]
    validate_only: bool,

    /// Output file for accepted records (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<String>,

    /// Trace every scanner decision to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.show_configs {
        show_help();
        return Ok(());
    }

    eprintln!("🦀 Metagate");

    let input = args.input.as_deref().unwrap_or_default();

    // Check if input file exists
    if !Path::new(input).exists() {
        eprintln!("⚠️  Input file not found at: {input}");
        eprintln!("   Please check the file path.");
        std::process::exit(1);
    }

    let config = build_config(&args)?;
    if let Some(config_path) = &args.config {
        eprintln!("📋 Loaded config from: {}", config_path);
    } else {
        eprintln!("📋 Using default config");
    }

    let mut parser = MetadataParser::from_config(FileSource::new(input), &config)
        .context("invalid parser configuration")?;
    eprintln!(
        "📄 Processing: {} ({} rules)",
        parser.source_name(),
        parser.rules().len()
    );

    let outcome = if args.validate_only {
        parser.process_metadata_only()?
    } else {
        let sink: Box<dyn Write> = match &args.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path).with_context(|| format!("creating output {path}"))?,
            )),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        let mut writer = RecordWriter::new(sink);
        let outcome = parser.process_with_handler(Some(&mut writer))?;
        let written = writer.finish().context("writing records")?;
        if let Some(path) = &args.output {
            eprintln!("💾 {written} records saved to: {path}");
        }
        outcome
    };

    let report = ValidationReport::from_outcome(&outcome);
    report.print();

    if let Some(summary_path) = &args.summary {
        RunSummary::new(input, args.validate_only, &outcome).save(summary_path)?;
        eprintln!("💾 Summary saved to: {summary_path}");
    }

    if !outcome.is_valid() {
        eprintln!("❌ Header validation failed: {}", outcome.failures.join(", "));
        std::process::exit(2);
    }

    eprintln!("✅ Successfully processed {input}");
    Ok(())
}

/// Load config (or defaults) and apply CLI overrides on top
fn build_config(args: &Args) -> Result<ParsingConfig> {
    let mut config = match &args.config {
        Some(path) => ParsingConfig::load_from_file(path)?,
        None => ParsingConfig::default(),
    };

    if let Some(split) = &args.split {
        config.header_split.pattern = split.clone();
    }
    if let Some(mode) = &args.split_mode {
        config.header_split.mode = match mode.as_str() {
            "literal" => SplitMode::Literal,
            "regex" => SplitMode::Regex,
            "whitespace_tolerant" => SplitMode::WhitespaceTolerant,
            other => anyhow::bail!("unknown split mode '{other}'"),
        };
    }
    if let Some(mode) = &args.report_mode {
        config.report_mode = match mode.as_str() {
            "all" => ReportMode::All,
            "first" => ReportMode::First,
            other => anyhow::bail!("unknown report mode '{other}'"),
        };
    }

    for key in &args.require {
        config.rules.push(RuleConfig {
            label: format!("{key} exists"),
            check: RuleCheck::Exists { key: key.clone() },
            enabled: true,
        });
    }

    if args.verbose {
        config.debug.enabled = true;
    }

    Ok(config)
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --input <path>          Data file to process");
    println!("  --config <path>         Load YAML config (split pattern, rules)");
    println!("  --split <pattern>       Header split pattern (default: '=')");
    println!("  --split-mode <mode>     literal, regex, or whitespace_tolerant");
    println!("  --require <key>         Require a header key (repeatable)");
    println!("  --report-mode <mode>    all (every failing rule) or first");
    println!("  --validate-only         Check the header without emitting records");
    println!("  --output <path>         Write accepted records here (default: stdout)");
    println!("  --summary <path>        Write a JSON run summary");

    println!("\n📄 Config file (YAML):");
    println!("  header_split: {{ pattern: \"=\", mode: literal }}");
    println!("  comment_marker: \"#\"");
    println!("  report_mode: all");
    println!("  rules:");
    println!("    - label: \"d is digits\"");
    println!("      check: {{ kind: matches, key: d, pattern: \"^[0-9]+$\" }}");

    println!("\n🔎 Rule kinds:");
    println!("  exists, absent, non_empty   {{ key }}");
    println!("  equals                      {{ key, value }}");
    println!("  matches                     {{ key, pattern }}");
    println!("  one_of                      {{ key, values }}");

    println!("\n📝 Usage Examples:");
    println!("  metagate -i readings.dat -c configs/station.yaml");
    println!("  metagate -i readings.dat --require station --validate-only");
    println!("  metagate -i readings.dat -s ':' --split-mode whitespace_tolerant -o rows.csv");

    println!("\n🚦 Exit status: 0 valid, 2 rule failure, 1 error");
}
