//! Year-versus-score scatter plot.
//!
//! Points are positioned by year of construction (x) and score (y), sized
//! by room count and colored by a categorical field.

use super::visibility::RadiusMemo;
use super::Annotation;
use crate::analysis::extent;
use crate::config::ChartConfig;
use crate::models::{Categorized, CategoryField, CategoryKey, HotelRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Opacity of a freshly drawn point.
const INITIAL_OPACITY: f64 = 0.9;

/// Sizing and coloring rules for scatter points.
#[derive(Debug, Clone)]
pub struct ScatterStyle {
    pub radius_divisor: f64,
    pub fallback_color: String,
    pub theme_colors: BTreeMap<String, String>,
    pub region_colors: BTreeMap<String, String>,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ScatterStyle {
    fn from(config: &ChartConfig) -> Self {
        Self {
            radius_divisor: config.radius_divisor,
            fallback_color: config.fallback_color.clone(),
            theme_colors: config.theme_colors.clone(),
            region_colors: config.region_colors.clone(),
        }
    }
}

impl ScatterStyle {
    /// Radius for a room count.
    pub fn radius_for(&self, rooms: u32) -> f64 {
        f64::from(rooms) / self.radius_divisor
    }

    /// Palette color for a category, or the fallback color.
    pub fn color_for(&self, field: CategoryField, key: &CategoryKey) -> String {
        let palette = match field {
            CategoryField::Theme => Some(&self.theme_colors),
            CategoryField::Region => Some(&self.region_colors),
            CategoryField::Country | CategoryField::Hotel => None,
        };

        palette
            .zip(key.as_str())
            .and_then(|(colors, name)| colors.get(name))
            .cloned()
            .unwrap_or_else(|| self.fallback_color.clone())
    }
}

/// A single scatter mark and its presentation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub hotel: String,
    pub year: i32,
    pub score: f64,
    pub rooms: u32,
    /// Value of the color field; visibility toggles act on this.
    pub category: CategoryKey,
    pub color: String,
    pub radius: f64,
    pub opacity: f64,
    pub tooltip: String,
}

impl ScatterPoint {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Scatter plot model.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPlot {
    pub color_field: CategoryField,
    /// Year range for the x axis.
    pub x_extent: Option<(i32, i32)>,
    /// Score range for the y axis.
    pub y_extent: Option<(f64, f64)>,
    pub points: Vec<ScatterPoint>,
    pub annotations: Vec<Annotation>,
}

impl ScatterPlot {
    /// Lay out one point per record.
    ///
    /// Returns the plot together with the radius each point was drawn with,
    /// so hidden points can later be restored to their original size.
    pub fn build<R: AsRef<HotelRecord>>(
        records: &[R],
        color_field: CategoryField,
        style: &ScatterStyle,
    ) -> (Self, RadiusMemo) {
        let records: Vec<&HotelRecord> = records.iter().map(AsRef::as_ref).collect();
        let mut memo = RadiusMemo::default();

        let points = records
            .iter()
            .map(|record| {
                let category = record.category(color_field);
                let radius = style.radius_for(record.rooms);
                memo.record(&record.hotel, radius);

                ScatterPoint {
                    hotel: record.hotel.clone(),
                    year: record.year,
                    score: record.score,
                    rooms: record.rooms,
                    color: style.color_for(color_field, &category),
                    category,
                    radius,
                    opacity: INITIAL_OPACITY,
                    tooltip: record.describe(),
                }
            })
            .collect();

        let plot = Self {
            color_field,
            x_extent: extent(&records, |r| r.year),
            y_extent: extent(&records, |r| r.score),
            points,
            annotations: highlight_annotations(&records),
        };

        (plot, memo)
    }

    /// Visible point count per color category, in first-seen order.
    pub fn visible_counts(&self) -> Vec<(CategoryKey, usize)> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut counts: HashMap<&CategoryKey, usize> = HashMap::new();

        for point in &self.points {
            if seen.insert(&point.category) {
                order.push(&point.category);
            }
            if point.is_visible() {
                *counts.entry(&point.category).or_default() += 1;
            }
        }

        order
            .into_iter()
            .map(|key| (key.clone(), counts.get(key).copied().unwrap_or(0)))
            .collect()
    }
}

/// Callouts for the oldest and the highest-rated hotel.
fn highlight_annotations(records: &[&HotelRecord]) -> Vec<Annotation> {
    let mut annotations = Vec::new();

    let oldest = first_by(records, |candidate, best| candidate.year < best.year);
    if let Some(r) = oldest {
        annotations.push(Annotation {
            title: format!("A Winner from {}", r.year),
            label: format!(
                "{} in {} is the oldest hotel in the collection.",
                r.hotel,
                r.category(CategoryField::Country)
            ),
            subject: r.hotel.clone(),
        });
    }

    // NaN scores compare false both ways and would stick as the winner.
    let scored: Vec<&HotelRecord> = records
        .iter()
        .copied()
        .filter(|r| !r.score.is_nan())
        .collect();
    let best = first_by(&scored, |candidate, best| candidate.score > best.score);
    if let Some(r) = best {
        annotations.push(Annotation {
            title: "The Current Champion".to_string(),
            label: format!(
                "{} in {} is the highest rated hotel in the collection!",
                r.hotel,
                r.category(CategoryField::Country)
            ),
            subject: r.hotel.clone(),
        });
    }

    annotations
}

/// First record that no later record beats.
fn first_by<'a, F>(records: &[&'a HotelRecord], beats: F) -> Option<&'a HotelRecord>
where
    F: Fn(&HotelRecord, &HotelRecord) -> bool,
{
    let mut winner: Option<&'a HotelRecord> = None;
    for &record in records {
        if winner.map_or(true, |w| beats(record, w)) {
            winner = Some(record);
        }
    }
    winner
}
