//! Oven Cycle CLI Application
//!
//! This is the command-line interface for the oven cycle detector.
//! It uses the oven-cycle-detector library and adds:
//! - TOML configuration with command-line overrides
//! - Logging setup
//! - Parallel per-group detection
//! - Report output to a file or stdout

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use oven_cycle_detector::{
    write_report, write_report_stdout, CycleExtractor, EventReader, OrderingPolicy,
    ReportFormat,
};
use std::path::{Path, PathBuf};

mod config;
mod pipeline;

/// Oven Cycle Detector - Extract baking cycles from oven controller event logs
#[derive(Parser, Debug)]
#[command(name = "oven-cycle")]
#[command(about = "Extract baking cycles from oven controller event logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the event export (delimited text)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file for the cycle report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Field delimiter for both input and CSV output
    #[arg(short, long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Do not sort groups by timestamp; fail if the input is out of order
    #[arg(long)]
    no_sort: bool,

    /// Order cycles by start time instead of by group
    #[arg(long)]
    sort_output: bool,

    /// Worker threads for group detection (default: one per core)
    #[arg(short = 'j', long, value_name = "COUNT")]
    threads: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Oven Cycle CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using detector library v{}", oven_cycle_detector::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };
    let config = apply_overrides(config, &args);

    match config.input.file.clone() {
        Some(input) => run(&config, &input),
        None => {
            // No input - show usage
            println!("Oven Cycle Detector - No input specified");
            println!("\nQuick Start:");
            println!("  oven-cycle --input sources_dataset.csv --output output.csv");
            println!("  oven-cycle --config config.toml");
            println!("\nUse --help for more options");
            Ok(())
        }
    }
}

/// Command-line values win over the config file
fn apply_overrides(mut config: config::AppConfig, args: &Args) -> config::AppConfig {
    if let Some(input) = &args.input {
        config.input.file = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.output.file = Some(output.clone());
    }
    if let Some(delimiter) = args.delimiter {
        config.input.source.delimiter = delimiter;
        config.output.report.delimiter = delimiter;
    }
    if let Some(format) = args.format {
        config.output.report.format = format.into();
    }
    if args.no_sort {
        config.processing.sort_groups = false;
    }
    if args.sort_output {
        config.output.sort_by_start = true;
    }
    if args.threads.is_some() {
        config.processing.threads = args.threads;
    }
    config
}

/// Read, detect and report
fn run(config: &config::AppConfig, input: &Path) -> Result<()> {
    if let Some(threads) = config.processing.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
        log::debug!("Using {} worker thread(s)", threads);
    }

    let ordering = if config.processing.sort_groups {
        OrderingPolicy::Sort
    } else {
        OrderingPolicy::Validate
    };
    let extractor = CycleExtractor::new(config.input.source.clone()).with_ordering(ordering);

    let records = EventReader::from_path(input, extractor.source())
        .and_then(|reader| reader.read_all())
        .with_context(|| format!("Failed to read event file: {:?}", input))?;

    let mut summary = pipeline::extract_parallel(&extractor, records)?;
    if config.output.sort_by_start {
        pipeline::sort_by_start(&mut summary.cycles);
    }

    match &config.output.file {
        Some(path) => write_report(path, &summary.cycles, &config.output.report)
            .with_context(|| format!("Failed to write report: {:?}", path))?,
        None => write_report_stdout(&summary.cycles, &config.output.report)
            .context("Failed to write report to stdout")?,
    }

    log::info!(
        "Done: {} rows, {} groups, {} cycle(s)",
        summary.rows,
        summary.groups,
        summary.cycles.len()
    );
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // Logs go to stderr so a report on stdout stays clean
    Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_config() {
        let args = Args::parse_from([
            "oven-cycle",
            "--input",
            "events.csv",
            "--delimiter",
            ",",
            "--format",
            "json",
            "--no-sort",
            "--sort-output",
            "-j",
            "3",
        ]);
        let config = apply_overrides(config::AppConfig::default(), &args);

        assert_eq!(config.input.file, Some(PathBuf::from("events.csv")));
        assert_eq!(config.input.source.delimiter, ',');
        assert_eq!(config.output.report.delimiter, ',');
        assert_eq!(config.output.report.format, ReportFormat::Json);
        assert!(!config.processing.sort_groups);
        assert!(config.output.sort_by_start);
        assert_eq!(config.processing.threads, Some(3));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["oven-cycle"]);
        let mut base = config::AppConfig::default();
        base.processing.sort_groups = false;

        let config = apply_overrides(base, &args);
        assert!(!config.processing.sort_groups);
        assert!(config.input.file.is_none());
    }
}
