//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.hotelstats.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".hotelstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "hotel_report.md".to_string()
}

/// Dataset location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path or HTTP(S) URL of the CSV file.
    #[serde(default = "default_source")]
    pub source: String,

    /// Timeout for remote fetches in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_source() -> String {
    "100_hotels.csv".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Chart appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Room count is divided by this to get a scatter radius.
    #[serde(default = "default_radius_divisor")]
    pub radius_divisor: f64,

    /// Color for categories missing from the palettes.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,

    /// Theme name to color.
    #[serde(default = "default_theme_colors")]
    pub theme_colors: BTreeMap<String, String>,

    /// Region name to color.
    #[serde(default = "default_region_colors")]
    pub region_colors: BTreeMap<String, String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            radius_divisor: default_radius_divisor(),
            fallback_color: default_fallback_color(),
            theme_colors: default_theme_colors(),
            region_colors: default_region_colors(),
        }
    }
}

fn default_radius_divisor() -> f64 {
    11.0
}

fn default_fallback_color() -> String {
    "#999999".to_string()
}

fn palette(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_theme_colors() -> BTreeMap<String, String> {
    palette(&[
        ("Coastal", "#537c78"),
        ("Contemporary", "#7ba591"),
        ("Island", "#cc222b"),
        ("Nature", "#f15b4c"),
        ("Palace", "#faa41b"),
        ("Safari", "#ffd45b"),
    ])
}

fn default_region_colors() -> BTreeMap<String, String> {
    palette(&[
        ("Africa", "#ff6961"),
        ("Asia", "#ffb480"),
        ("Caribbean", "#f8f38d"),
        ("Europe", "#42d6a4"),
        ("Latin America", "#08cad1"),
        ("Middle East", "#59adf6"),
        ("North America", "#9d94ff"),
        ("Oceania", "#3c1414"),
        ("Southeast Asia", "#c780e8"),
    ])
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.source = data.clone();
        }

        if let Some(timeout) = args.timeout {
            self.data.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(divisor) = args.radius_divisor {
            self.chart.radius_divisor = divisor;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values that would otherwise produce a broken chart or fetch.
    ///
    /// Applies the same rules as the matching CLI flags, since either source
    /// can set them.
    pub fn validate(&self) -> Result<()> {
        if self.data.source.trim().is_empty() {
            bail!("[data] source must not be empty");
        }

        if self.data.timeout_seconds == 0 {
            bail!("[data] timeout_seconds must be at least 1");
        }

        let divisor = self.chart.radius_divisor;
        if !divisor.is_finite() || divisor <= 0.0 {
            bail!("[chart] radius_divisor must be a positive number, got {}", divisor);
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
