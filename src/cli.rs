//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{CategoryField, CategoryKey, ChartKind};
use clap::Parser;
use std::path::PathBuf;

/// HotelStats - chart data builder for award-winning hotel datasets
///
/// Loads a hotel CSV, counts hotels per category, lays out a
/// year-versus-score scatter and writes the chart model as a
/// Markdown or JSON report.
///
/// Examples:
///   hotelstats --data 100_hotels.csv
///   hotelstats --data https://example.com/100_hotels.csv --format json
///   hotelstats --category theme --chart bar
///   hotelstats --hide Coastal,Island --list-records
///   hotelstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path or HTTP(S) URL of the hotel CSV
    ///
    /// Defaults to the [data] source in .hotelstats.toml, then 100_hotels.csv.
    #[arg(short, long, value_name = "PATH|URL", env = "HOTELSTATS_DATA")]
    pub data: Option<String>,

    /// Field used for the per-category counts
    #[arg(long, default_value = "region", value_name = "FIELD")]
    pub category: CategoryField,

    /// Field used to color scatter points and to toggle their visibility
    #[arg(long, default_value = "theme", value_name = "FIELD")]
    pub color_by: CategoryField,

    /// Which chart sections to include
    #[arg(long, default_value = "all", value_name = "CHART")]
    pub chart: ChartKind,

    /// Categories to hide on the scatter plot (comma-separated)
    ///
    /// Example: --hide Coastal,Island. Use "undefined" for records
    /// without a value.
    #[arg(long, value_name = "CATEGORIES", value_delimiter = ',')]
    pub hide: Vec<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .hotelstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include the aggregated record table in the report
    #[arg(long)]
    pub list_records: bool,

    /// Timeout for remote fetches in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Divide room counts by this to get scatter radii
    #[arg(long, value_name = "NUM")]
    pub radius_divisor: Option<f64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .hotelstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref data) = self.data {
            if data.trim().is_empty() {
                return Err("Dataset path must not be empty".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(divisor) = self.radius_divisor {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err("Radius divisor must be a positive number".to_string());
            }
        }

        if self.hide.iter().any(|h| h.trim().is_empty()) {
            return Err("--hide entries must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from the config file; `--quiet` still wins.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Categories named by --hide, with "undefined" mapped to the sentinel bucket.
    pub fn hidden_categories(&self) -> Vec<CategoryKey> {
        self.hide
            .iter()
            .map(|h| match h.trim() {
                "undefined" => CategoryKey::Undefined,
                other => CategoryKey::from(other),
            })
            .collect()
    }
}
