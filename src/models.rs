//! Data models for the hotel dataset.
//!
//! This module contains the core data structures used throughout
//! the application for representing hotel records, categories, and reports.

use crate::chart::{BarChart, ScatterPlot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single row of the hotel table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    /// Hotel name, used as the record identity.
    #[serde(rename = "Hotel")]
    pub hotel: String,
    /// Geographic region (e.g. "Southeast Asia").
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
    /// Country the hotel is located in.
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    /// Hotel theme (e.g. "Coastal", "Island").
    #[serde(rename = "Theme", default)]
    pub theme: Option<String>,
    /// Year of construction.
    #[serde(rename = "Year")]
    pub year: i32,
    /// Rating on a 0-100 scale.
    #[serde(rename = "Score")]
    pub score: f64,
    /// Number of rooms.
    #[serde(rename = "Rooms")]
    pub rooms: u32,
}

impl HotelRecord {
    /// Returns the raw value of a categorical field, if present.
    pub fn field(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Hotel => Some(self.hotel.as_str()),
            CategoryField::Region => self.region.as_deref(),
            CategoryField::Country => self.country.as_deref(),
            CategoryField::Theme => self.theme.as_deref(),
        }
    }

    /// Tooltip text shown for this record on the scatter plot.
    pub fn describe(&self) -> String {
        format!(
            "{} is a {} hotel built in {}, in {}, with {} rooms.",
            self.hotel,
            self.category(CategoryField::Theme),
            self.year,
            self.category(CategoryField::Country),
            self.rooms
        )
    }
}

impl AsRef<HotelRecord> for HotelRecord {
    fn as_ref(&self) -> &HotelRecord {
        self
    }
}

/// Attribute used to group records for counting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    Hotel,
    #[default]
    Region,
    Country,
    Theme,
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryField::Hotel => write!(f, "hotel"),
            CategoryField::Region => write!(f, "region"),
            CategoryField::Country => write!(f, "country"),
            CategoryField::Theme => write!(f, "theme"),
        }
    }
}

/// Value of a category field, with an explicit bucket for records lacking one.
///
/// Records whose category attribute is absent (missing column or empty cell)
/// are grouped under [`CategoryKey::Undefined`] rather than rejected. This is
/// intentional and mirrors how the charts have always treated such rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    Value(String),
    Undefined,
}

impl CategoryKey {
    /// Returns the text value, or `None` for the undefined bucket.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CategoryKey::Value(v) => Some(v.as_str()),
            CategoryKey::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, CategoryKey::Undefined)
    }
}

impl From<Option<&str>> for CategoryKey {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(v) => CategoryKey::Value(v.to_string()),
            None => CategoryKey::Undefined,
        }
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        CategoryKey::Value(value.to_string())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Value(v) => write!(f, "{}", v),
            CategoryKey::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryKey::Value(v) => serializer.serialize_str(v),
            CategoryKey::Undefined => serializer.serialize_none(),
        }
    }
}

/// Anything that can be grouped by a [`CategoryField`].
pub trait Categorized {
    fn category(&self, field: CategoryField) -> CategoryKey;
}

impl Categorized for HotelRecord {
    fn category(&self, field: CategoryField) -> CategoryKey {
        CategoryKey::from(self.field(field))
    }
}

impl<R: Categorized + ?Sized> Categorized for &R {
    fn category(&self, field: CategoryField) -> CategoryKey {
        (**self).category(field)
    }
}

/// A record with the derived per-category `count` attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counted<R> {
    #[serde(flatten)]
    pub record: R,
    /// Number of records sharing this record's category value.
    pub count: usize,
}

impl<R: Categorized> Categorized for Counted<R> {
    fn category(&self, field: CategoryField) -> CategoryKey {
        self.record.category(field)
    }
}

impl AsRef<HotelRecord> for Counted<HotelRecord> {
    fn as_ref(&self) -> &HotelRecord {
        &self.record
    }
}

/// Which chart sections a report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChartKind {
    /// Category counts only
    Bar,
    /// Year-versus-score scatter only
    Scatter,
    /// Everything
    #[default]
    All,
}

impl ChartKind {
    pub fn includes_bar(&self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::All)
    }

    pub fn includes_scatter(&self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::All)
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path or URL the dataset was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records loaded.
    pub records: usize,
    /// Field used for the category counts.
    pub category_field: CategoryField,
    /// Records that fell into the undefined bucket.
    pub undefined_records: usize,
    /// Load and build duration in seconds.
    pub duration_seconds: f64,
}

/// The complete report handed to the renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<BarChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<ScatterPlot>,
    /// Categories hidden on the scatter plot.
    pub hidden: Vec<CategoryKey>,
    /// Aggregated table, included on request.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Counted<HotelRecord>>,
}

#[cfg(test)]
pub(crate) fn hotel(name: &str, region: Option<&str>) -> HotelRecord {
    HotelRecord {
        hotel: name.to_string(),
        region: region.map(String::from),
        country: Some("Nowhere".to_string()),
        theme: Some("Coastal".to_string()),
        year: 2000,
        score: 90.0,
        rooms: 44,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_display() {
        assert_eq!(CategoryKey::from("Europe").to_string(), "Europe");
        assert_eq!(CategoryKey::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_missing_field_maps_to_undefined() {
        let record = hotel("Nameless", None);
        assert_eq!(record.category(CategoryField::Region), CategoryKey::Undefined);
        assert_eq!(
            record.category(CategoryField::Hotel),
            CategoryKey::from("Nameless")
        );
    }

    #[test]
    fn test_describe() {
        let record = hotel("Seaside", Some("Europe"));
        assert_eq!(
            record.describe(),
            "Seaside is a Coastal hotel built in 2000, in Nowhere, with 44 rooms."
        );
    }

    #[test]
    fn test_counted_serializes_flat() {
        let counted = Counted {
            record: hotel("Seaside", None),
            count: 3,
        };
        let json = serde_json::to_value(&counted).unwrap();
        assert_eq!(json["Hotel"], "Seaside");
        assert_eq!(json["count"], 3);
        assert!(json["Region"].is_null());
    }

    #[test]
    fn test_chart_kind_sections() {
        assert!(ChartKind::All.includes_bar());
        assert!(ChartKind::All.includes_scatter());
        assert!(!ChartKind::Bar.includes_scatter());
        assert!(!ChartKind::Scatter.includes_bar());
    }
}
