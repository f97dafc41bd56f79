//! Error types for dataset loading.
//!
//! Loading is the only fallible step in the pipeline; aggregation and chart
//! building never fail. Application code wraps these with `anyhow` context.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching or parsing the hotel dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Local file could not be read.
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote fetch failed before a response arrived.
    #[error("Failed to fetch dataset from {url}: {message}")]
    Http { url: String, message: String },

    /// Remote server answered with a non-success status.
    #[error("Dataset server returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// CSV layer failure (bad quoting, unreadable header, etc.)
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// A data row could not be converted into a record.
    #[error("Invalid record on line {line}: {message}")]
    Parse { line: u64, message: String },
}

/// Standard Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    /// Build an `Io` error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a reqwest failure into a readable `Http` error.
    pub fn http(url: &str, err: &reqwest::Error, timeout_seconds: u64) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out after {}s", timeout_seconds)
        } else if err.is_connect() {
            "cannot connect to host".to_string()
        } else {
            err.to_string()
        };
        Self::Http {
            url: url.to_string(),
            message,
        }
    }
}
