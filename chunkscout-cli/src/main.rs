use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufReader};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use chunkscout::config::DEFAULT_CHUNK_SIZE;
use chunkscout::sink::{ConsoleSink, FanoutSink, FileSink, ReportSink};
use chunkscout::{scan, targets, MatchReport, ScanConfig};

#[derive(Parser)]
#[command(author, version, about = "Searches a line stream for a set of targets, in parallel chunks", long_about = None)]
struct Cli {
    /// Input file to scan, or '-' to read from stdin
    input: PathBuf,

    /// File holding the target set, one target per line
    #[arg(short = 't', long = "targets")]
    target_file: Option<PathBuf>,

    /// Inline target (can be specified multiple times)
    #[arg(short = 'p', long = "pattern")]
    patterns: Vec<String>,

    /// File to persist the report to, in addition to stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Lines per chunk
    #[arg(short = 'c', long)]
    chunk_size: Option<usize>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the report as JSON instead of the plain text format
    #[arg(long)]
    json: bool,

    /// Show only statistics, not the per-target report
    #[arg(short, long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    run(cli)
}

fn init_logging(level: &str) {
    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    let report = if cli.input == PathBuf::from("-") {
        scan(BufReader::new(io::stdin()), &config)?
    } else {
        let file = File::open(&cli.input)
            .with_context(|| format!("failed to open input {}", cli.input.display()))?;
        scan(BufReader::new(file), &config)?
    };

    let rendered = if cli.json {
        let mut encoded = serde_json::to_string_pretty(&report)
            .context("failed to encode report as JSON")?;
        encoded.push('\n');
        encoded
    } else {
        report.render()
    };

    deliver_report(&cli, &rendered);

    if cli.stats {
        print_stats(&report);
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let file_config = ScanConfig::load_from(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    let mut cli_targets = Vec::new();
    if let Some(path) = &cli.target_file {
        cli_targets.extend(targets::load_targets(path)?);
    }
    cli_targets.extend(cli.patterns.iter().cloned());

    let cli_config = ScanConfig {
        targets: cli_targets,
        chunk_size: cli.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        thread_count: cli.threads.unwrap_or_else(default_thread_count),
        log_level: cli.log_level.clone(),
    };
    let config = file_config.merge_with_cli(cli_config);

    if config.targets.is_empty() && cli.target_file.is_none() {
        bail!("no targets provided: use --targets <file> or --pattern <target>");
    }
    Ok(config)
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get().saturating_sub(1).max(1)).unwrap()
}

/// Hands the rendered report to every configured sink. A sink failure is
/// reported once; the computed report stays valid.
fn deliver_report(cli: &Cli, rendered: &str) {
    let mut sink = FanoutSink::new();
    if !cli.stats {
        sink.push(Box::new(ConsoleSink));
    }
    if let Some(path) = &cli.output {
        sink.push(Box::new(FileSink::new(path)));
    }

    if let Err(e) = sink.write_report(rendered) {
        warn!("failed to deliver report: {}", e);
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
}

fn print_stats(report: &MatchReport) {
    println!(
        "{} matches across {} targets",
        report.total_matches().to_string().bold(),
        report.targets_matched()
    );
}
