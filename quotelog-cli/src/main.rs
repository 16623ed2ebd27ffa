//! Quotelog CLI — track and report commands.
//!
//! Commands:
//! - `track` — poll configured symbols until Ctrl-C, then build the workbook
//! - `report` — rebuild a workbook from an existing log file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotelog_core::config::TrackerConfig;
use quotelog_core::log::SampleLog;
use quotelog_core::manifest::RunManifest;
use quotelog_core::quote::{QuoteProvider, SyntheticProvider, YahooQuoteProvider};
use quotelog_core::report::build_workbook;
use quotelog_core::sample::TIMESTAMP_FORMAT;
use quotelog_core::scheduler::{CancelToken, PollScheduler, StdoutProgress};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "quotelog",
    about = "Quotelog CLI — interval price polling and workbook reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll configured symbols until Ctrl-C, then build the workbook report.
    Track {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to poll (overrides the config file).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Seconds between ticks (overrides the config file).
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Output directory for the log, manifest, and workbook.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Use the deterministic synthetic provider instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Rebuild a workbook report from an existing log file.
    Report {
        /// Path to a quotes CSV log.
        log: PathBuf,

        /// Workbook output path. Defaults to the log path with .xlsx.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Currency label for the price axis.
        #[arg(long, default_value = "USD")]
        currency: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Track {
            config,
            symbols,
            interval_secs,
            output_dir,
            synthetic,
        } => run_track(config, symbols, interval_secs, output_dir, synthetic),
        Commands::Report {
            log,
            output,
            currency,
        } => run_report(&log, output, &currency),
    }
}

/// Config file (or defaults) with flag overrides applied, validated once.
fn resolve_config(
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
    interval_secs: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<TrackerConfig> {
    let mut config = match config_path {
        Some(path) => TrackerConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    if !symbols.is_empty() {
        config.symbols = symbols;
    }
    if let Some(secs) = interval_secs {
        config.interval_secs = secs;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    config.validate()?;
    Ok(config)
}

fn run_track(
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
    interval_secs: Option<u64>,
    output_dir: Option<PathBuf>,
    synthetic: bool,
) -> Result<()> {
    let config = resolve_config(config_path, symbols, interval_secs, output_dir)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output dir {}",
            config.output_dir.display()
        )
    })?;

    // Auto-name this run's files with the start time.
    let started = chrono::Local::now();
    let stamp = started.format("%Y-%m-%d_%H-%M-%S");
    let log_path = config.output_dir.join(format!("quotes_{stamp}.csv"));
    let workbook_path = config.output_dir.join(format!("quotes_{stamp}.xlsx"));
    let manifest_path = config.output_dir.join(format!("quotes_{stamp}.meta.json"));

    let log = SampleLog::create(&log_path)?;

    let manifest = RunManifest {
        symbols: config.symbols.clone(),
        interval_secs: config.interval_secs,
        started_at: started.naive_local(),
        log_file: log_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    manifest.save(&manifest_path)?;

    let provider: Box<dyn QuoteProvider> = if synthetic {
        Box::new(SyntheticProvider::new())
    } else {
        Box::new(YahooQuoteProvider::new())
    };

    println!("Tracking: {}", config.symbols.join(", "));
    println!("Logging every {}s via {}.", config.interval_secs, provider.name());
    println!("Saving files in: {}", config.output_dir.display());
    println!("Press Ctrl-C to stop.");

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install Ctrl-C handler")?;

    let mut scheduler = PollScheduler::new(
        config.symbols.clone(),
        Duration::from_secs(config.interval_secs),
    );
    let stats = scheduler.run(provider.as_ref(), &log, &cancel, &StdoutProgress)?;

    println!();
    println!(
        "Stopped logging after {} tick(s), {} sample(s) ({} unavailable).",
        stats.ticks, stats.samples, stats.unavailable
    );
    println!("Data saved in CSV: {}", log_path.display());

    let report = build_workbook(&log_path, &workbook_path, &config.currency).with_context(|| {
        format!(
            "report generation failed; the CSV log remains intact at {}",
            log_path.display()
        )
    })?;
    println!(
        "Workbook saved with chart and summary: {}",
        report.workbook_path.display()
    );

    Ok(())
}

fn run_report(log_path: &Path, output: Option<PathBuf>, currency: &str) -> Result<()> {
    let out_path = output.unwrap_or_else(|| log_path.with_extension("xlsx"));

    // Show run metadata when the sidecar from the original run is present.
    let meta_path = log_path.with_extension("meta.json");
    if let Ok(manifest) = RunManifest::load(&meta_path) {
        println!(
            "Run started {}: {} every {}s",
            manifest.started_at.format(TIMESTAMP_FORMAT),
            manifest.symbols.join(", "),
            manifest.interval_secs
        );
    }

    let report = build_workbook(log_path, &out_path, currency).with_context(|| {
        format!(
            "report generation failed; the CSV log remains intact at {}",
            log_path.display()
        )
    })?;

    println!("Rows: {}", report.rows);
    for s in &report.summaries {
        println!(
            "{}: highest {:.3}, lowest {:.3}, average {:.3} over {} sample(s)",
            s.symbol, s.highest, s.lowest, s.average, s.sample_count
        );
    }
    println!("Workbook saved: {}", report.workbook_path.display());

    Ok(())
}
