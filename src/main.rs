//! HotelStats - chart data builder for award-winning hotel datasets
//!
//! Loads a hotel CSV, counts hotels per category, lays out a
//! year-versus-score scatter and writes the chart model as a report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, dataset fetch/parse failure, write failure)

mod analysis;
mod chart;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use chart::{BarChart, ScatterStyle, Session};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use dataset::{DataSource, LoadOptions};
use models::{Report, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging starts so its verbose flag takes effect.
    let (config, origin) = match prepare_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("HotelStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .hotelstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the data source, palettes, and radius scale.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, aggregate, lay out and write the report.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let source = DataSource::parse(&config.data.source);
    let load_options = LoadOptions {
        timeout_seconds: config.data.timeout_seconds,
        show_progress: !args.quiet,
    };

    // Step 1: fetch and parse
    if source.is_remote() {
        info!(
            "Fetching remote dataset (timeout {}s)",
            load_options.timeout_seconds
        );
    }
    if !args.quiet {
        println!("📥 Loading dataset: {}", source);
    }
    let records = dataset::load_records(&source, &load_options)
        .await
        .with_context(|| format!("Could not load dataset from {}", source))?;

    if records.is_empty() {
        warn!("Dataset {} contains no records", source);
    }

    // Step 2: aggregate and lay out
    let undefined_records = analysis::undefined_count(&records, args.category);
    if undefined_records > 0 {
        debug!(
            "{} record(s) have no {} and are counted as undefined",
            undefined_records, args.category
        );
    }

    let style = ScatterStyle::from(&config.chart);
    let mut session = Session::new(records, args.category, args.color_by, &style);

    for (category, count) in analysis::category_counts(session.table(), args.category) {
        debug!("{} {}: {} hotel(s)", args.category, category, count);
    }
    if !session.memo().is_empty() {
        debug!("Recorded radii for {} hotel(s)", session.memo().len());
    }

    // Step 3: apply visibility toggles
    for category in args.hidden_categories() {
        if !session.plot().points.iter().any(|p| p.category == category) {
            warn!("No {} named '{}' to hide", args.color_by, category);
        }
        session.toggle(&category, false);
    }
    if !session.hidden().is_empty() {
        let names: Vec<String> = session.hidden().iter().map(ToString::to_string).collect();
        info!("Hidden {} categories: {}", args.color_by, names.join(", "));
    }

    let bar = args
        .chart
        .includes_bar()
        .then(|| BarChart::build(session.table(), args.category));

    let (table, scatter, hidden) = session.into_parts();

    let metadata = ReportMetadata {
        source: source.to_string(),
        generated_at: Utc::now(),
        records: table.len(),
        category_field: args.category,
        undefined_records,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        bar,
        scatter: args.chart.includes_scatter().then_some(scatter),
        hidden,
        records: if args.list_records { table } else { Vec::new() },
    };

    // Step 4: render and save
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        print_summary(&report);
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(())
}

/// Print a short console summary of the report.
fn print_summary(report: &Report) {
    println!("\n📊 Summary:");
    println!("   Records: {}", report.metadata.records);

    if let Some(ref bar) = report.bar {
        println!(
            "   Distinct {} values: {}",
            report.metadata.category_field,
            bar.bars.len()
        );
        if let Some(ref headline) = bar.headline {
            println!("   {} ({})", headline.label, headline.title);
        }
    }

    if let Some(ref scatter) = report.scatter {
        if let Some((lo, hi)) = scatter.x_extent {
            println!("   Built between {} and {}", lo, hi);
        }
        let visible = scatter.points.iter().filter(|p| p.is_visible()).count();
        println!("   Visible points: {}/{}", visible, scatter.points.len());
    }
}

/// Where the configuration for this run came from.
enum ConfigOrigin {
    Explicit(PathBuf),
    Default,
    Builtin,
    Unreadable(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::Default => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config, using defaults: {}", e),
        }
    }
}

/// Load the config, apply CLI overrides and validate the result.
fn prepare_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    let (mut config, origin) = load_config(args)?;
    config.merge_with_args(args);
    config.validate().context("Invalid configuration")?;
    Ok((config, origin))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::Default)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(format!("{:#}", e)))),
    }
}
