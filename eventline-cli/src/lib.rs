#![warn(missing_docs)]
//! Eventline CLI Library
//!
//! Reads an already-fetched events dataset (file or stdin), runs the summary
//! pipeline and renders the report.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     eventline_cli::run()
//! }
//! ```

mod config;
mod formatting;

pub use config::*;
pub use formatting::format_human_output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eventline_core::{
    BucketAlignment, BucketSpec, EventsDataset, FetchAction, FetchState, summarize,
};
use eventline_report::{
    EngagementSummary, OutputFormat, build_report, generate_csv_report, generate_json_report,
    generate_summary_json,
};
use eventline_stats::{OutlierMethod, QuartileIndex};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Eventline CLI arguments
#[derive(Parser, Debug)]
#[command(name = "eventline")]
#[command(author, version, about = "Eventline - event-time statistics and timelines")]
pub struct Cli {
    /// Optional subcommand (Run, Stats, InitConfig); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dataset JSON file; `-` reads stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Engagement summary JSON shown above the timeline
    #[arg(long, global = true)]
    pub engagement: Option<PathBuf>,

    /// Bucket width (e.g., "5s", "500ms"; bare numbers are seconds)
    #[arg(long, global = true)]
    pub bucket_width: Option<String>,

    /// Use the legacy window layout, starting at [-width, 0]
    #[arg(long, global = true)]
    pub legacy_buckets: bool,

    /// Treat an out-of-range upper quartile as absent instead of clamping it
    #[arg(long, global = true)]
    pub strict_quartiles: bool,

    /// Skip outlier filtering
    #[arg(long, global = true)]
    pub no_outliers: bool,

    /// Configuration file (default: discover eventline.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of threads for per-user binning
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0", global = true)]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full report: statistics, engagement and timeline (default)
    Run {
        /// Dataset JSON file; `-` reads stdin
        input: Option<String>,
    },
    /// Sorted users plus statistics, as JSON
    Stats {
        /// Dataset JSON file; `-` reads stdin
        input: Option<String>,
    },
    /// Print a default eventline.toml
    InitConfig,
}

/// Binning and filtering settings after layering config and CLI flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    /// Timeline binning
    pub buckets: BucketSpec,
    /// Outlier filtering
    pub outliers: OutlierMethod,
}

/// Run the Eventline CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Eventline CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EventlineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EventlineConfig::discover().unwrap_or_default(),
    };

    // Configure Rayon thread pool for per-user binning
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    match &cli.command {
        Some(Commands::InitConfig) => {
            print!("{}", EventlineConfig::default_toml());
            Ok(())
        }
        Some(Commands::Stats { input }) => {
            let input = input.as_deref().unwrap_or(&cli.input);
            summarize_stats(&cli, &config, input)
        }
        Some(Commands::Run { input }) => {
            let input = input.as_deref().unwrap_or(&cli.input);
            run_report(&cli, &config, input)
        }
        None => run_report(&cli, &config, &cli.input),
    }
}

/// Install the fmt subscriber on stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "eventline=debug"
    } else {
        "eventline=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Layer `eventline.toml` values with CLI overrides.
pub fn build_analysis_settings(
    cli: &Cli,
    config: &EventlineConfig,
) -> anyhow::Result<AnalysisSettings> {
    let file_spec = config.bucket_spec().context("Invalid [binning] configuration")?;

    let width_ms = match &cli.bucket_width {
        Some(width) => EventlineConfig::parse_duration(width)?,
        None => file_spec.width_ms(),
    };
    let alignment = if cli.legacy_buckets {
        BucketAlignment::Legacy
    } else {
        file_spec.alignment()
    };
    let buckets = BucketSpec::new(width_ms, alignment)?;

    let outliers = match config.outlier_method() {
        _ if cli.no_outliers => OutlierMethod::None,
        OutlierMethod::Iqr { multiplier, .. } if cli.strict_quartiles => OutlierMethod::Iqr {
            multiplier,
            quartiles: QuartileIndex::Strict,
        },
        method => method,
    };

    Ok(AnalysisSettings { buckets, outliers })
}

/// Load a dataset from a path or stdin, tracked through a [`FetchState`].
pub fn load_dataset(input: &str) -> anyhow::Result<EventsDataset> {
    let state = FetchState::Idle.reduce(FetchAction::Init);
    info!(source = input, "loading dataset");

    let result = if input == "-" {
        EventsDataset::from_reader(std::io::stdin().lock())
    } else {
        EventsDataset::load(input)
    };

    let state = state.reduce(FetchAction::from(result));
    if let Some(dataset) = state.data() {
        debug!(
            users = dataset.users.len(),
            events = dataset.event_count(),
            "dataset loaded"
        );
    }

    let outcome = state
        .into_result()
        .context("dataset fetch did not complete")?;
    outcome.with_context(|| format!("Failed to load dataset from {}", display_source(input)))
}

fn display_source(input: &str) -> &str {
    if input == "-" { "<stdin>" } else { input }
}

fn load_engagement(path: &Path) -> anyhow::Result<EngagementSummary> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read engagement summary {}", path.display()))?;
    Ok(EngagementSummary::from_json_str(&json)?)
}

fn resolve_format(cli: &Cli, config: &EventlineConfig) -> OutputFormat {
    let requested = cli.format.as_deref().unwrap_or(&config.output.format);
    requested.parse().unwrap_or_else(|e| {
        tracing::warn!("{}; falling back to human output", e);
        OutputFormat::Human
    })
}

fn write_output(cli: &Cli, output: &str) -> anyhow::Result<()> {
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        info!(path = %path.display(), "report written");
    } else {
        print!("{}", output);
    }
    Ok(())
}

fn run_report(cli: &Cli, config: &EventlineConfig, input: &str) -> anyhow::Result<()> {
    let settings = build_analysis_settings(cli, config)?;
    let format = resolve_format(cli, config);

    let engagement = cli.engagement.as_deref().map(load_engagement).transpose()?;
    let dataset = load_dataset(input)?;
    let summary = summarize(dataset, settings.outliers);

    let report = build_report(
        &summary,
        &settings.buckets,
        engagement,
        Some(display_source(input).to_string()),
    )
    .context("Failed to build timeline")?;
    debug!(
        buckets_per_user = report.summary.buckets_per_user,
        outliers_removed = report.summary.outliers_removed,
        "report built"
    );

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    write_output(cli, &output)
}

fn summarize_stats(cli: &Cli, config: &EventlineConfig, input: &str) -> anyhow::Result<()> {
    let settings = build_analysis_settings(cli, config)?;
    let dataset = load_dataset(input)?;
    let summary = summarize(dataset, settings.outliers);

    let mut output = generate_summary_json(&summary)?;
    output.push('\n');
    write_output(cli, &output)
}
