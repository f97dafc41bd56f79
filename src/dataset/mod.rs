//! Dataset loading.
//!
//! The hotel table comes from a CSV file on disk or behind an HTTP(S) URL.

pub mod loader;

pub use loader::{load_records, DataSource, LoadOptions};
