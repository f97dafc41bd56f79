//! Analysis modules.
//!
//! Aggregation passes that turn the loaded table into chart inputs.

pub mod aggregator;

pub use aggregator::*;
