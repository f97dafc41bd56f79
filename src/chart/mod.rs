//! Chart data models.
//!
//! Each chart is a plain data structure built from the aggregated table:
//! domains, extents, per-mark values, tooltip text and annotations. Drawing
//! them is left to whatever consumes the report.

pub mod bar;
pub mod scatter;
pub mod visibility;

use serde::Serialize;

pub use bar::BarChart;
pub use scatter::{ScatterPlot, ScatterStyle};
pub use visibility::Session;

/// A text callout attached to a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub label: String,
    /// Category or record the callout points at.
    pub subject: String,
}
