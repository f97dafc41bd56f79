//! Category visibility on the scatter plot.
//!
//! Hiding a category shrinks its points to nothing; showing it again
//! restores the radius each point was first drawn with. Those radii live in
//! a [`RadiusMemo`] that the caller owns and threads through every toggle.

use super::scatter::{ScatterPlot, ScatterPoint, ScatterStyle};
use crate::analysis::aggregate_by_category;
use crate::models::{CategoryField, CategoryKey, Counted, HotelRecord};
use std::collections::HashMap;
use tracing::debug;

/// Radius each point was drawn with, keyed by hotel name.
///
/// Hotels sharing a name share an entry; the last one recorded wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusMemo {
    radii: HashMap<String, f64>,
}

impl RadiusMemo {
    pub fn record(&mut self, hotel: &str, radius: f64) {
        self.radii.insert(hotel.to_string(), radius);
    }

    pub fn get(&self, hotel: &str) -> Option<f64> {
        self.radii.get(hotel).copied()
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}

/// Show or hide every point in `category`.
///
/// Only presentation state (radius, opacity) changes. The memo is taken by
/// value and handed back so ownership stays with the caller.
pub fn set_category_visible(
    points: &mut [ScatterPoint],
    memo: RadiusMemo,
    category: &CategoryKey,
    visible: bool,
) -> RadiusMemo {
    let mut touched = 0;

    for point in points.iter_mut().filter(|p| &p.category == category) {
        if visible {
            point.radius = memo.get(&point.hotel).unwrap_or(point.radius);
            point.opacity = 1.0;
        } else {
            point.radius = 0.0;
            point.opacity = 0.0;
        }
        touched += 1;
    }

    debug!(
        "{} {} point(s) in category {}",
        if visible { "Showing" } else { "Hiding" },
        touched,
        category
    );

    memo
}

/// Everything one run holds onto: the aggregated table, the laid-out
/// scatter and the radius memo.
#[derive(Debug, Clone)]
pub struct Session {
    table: Vec<Counted<HotelRecord>>,
    plot: ScatterPlot,
    memo: RadiusMemo,
    hidden: Vec<CategoryKey>,
}

impl Session {
    /// Aggregate the loaded records and lay out the scatter.
    pub fn new(
        records: Vec<HotelRecord>,
        category_field: CategoryField,
        color_field: CategoryField,
        style: &ScatterStyle,
    ) -> Self {
        let table = aggregate_by_category(records, category_field);
        let (plot, memo) = ScatterPlot::build(&table, color_field, style);

        Self {
            table,
            plot,
            memo,
            hidden: Vec::new(),
        }
    }

    /// Apply one checkbox change.
    pub fn toggle(&mut self, category: &CategoryKey, visible: bool) {
        let memo = std::mem::take(&mut self.memo);
        self.memo = set_category_visible(&mut self.plot.points, memo, category, visible);

        self.hidden.retain(|h| h != category);
        if !visible {
            self.hidden.push(category.clone());
        }
    }

    pub fn table(&self) -> &[Counted<HotelRecord>] {
        &self.table
    }

    pub fn plot(&self) -> &ScatterPlot {
        &self.plot
    }

    pub fn memo(&self) -> &RadiusMemo {
        &self.memo
    }

    /// Categories currently hidden, in the order they were hidden.
    pub fn hidden(&self) -> &[CategoryKey] {
        &self.hidden
    }

    pub fn into_parts(self) -> (Vec<Counted<HotelRecord>>, ScatterPlot, Vec<CategoryKey>) {
        (self.table, self.plot, self.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::parse_records;

    const SAMPLE: &str = include_str!("../../fixtures/hotels_sample.csv");

    fn session() -> Session {
        let records = parse_records(SAMPLE.as_bytes()).unwrap();
        Session::new(
            records,
            CategoryField::Region,
            CategoryField::Theme,
            &ScatterStyle::default(),
        )
    }

    fn point<'a>(session: &'a Session, hotel: &str) -> &'a ScatterPoint {
        session
            .plot()
            .points
            .iter()
            .find(|p| p.hotel == hotel)
            .unwrap()
    }

    #[test]
    fn test_session_aggregates_table() {
        let session = session();
        let amanpuri = session
            .table()
            .iter()
            .find(|c| c.record.hotel == "Amanpuri")
            .unwrap();
        assert_eq!(amanpuri.count, 3);
    }

    #[test]
    fn test_hide_then_show_restores_radius() {
        let mut session = session();
        let safari = CategoryKey::from("Safari");
        let original = point(&session, "Mahali Mzuri").radius;

        session.toggle(&safari, false);
        assert_eq!(point(&session, "Mahali Mzuri").radius, 0.0);
        assert!(!point(&session, "Mahali Mzuri").is_visible());
        assert_eq!(session.hidden(), &[safari.clone()]);

        session.toggle(&safari, true);
        assert_eq!(point(&session, "Mahali Mzuri").radius, original);
        assert_eq!(point(&session, "Mahali Mzuri").opacity, 1.0);
        assert!(session.hidden().is_empty());
    }

    #[test]
    fn test_toggle_leaves_other_categories() {
        let mut session = session();
        let before = point(&session, "Amanpuri").clone();

        session.toggle(&CategoryKey::from("Safari"), false);
        assert_eq!(point(&session, "Amanpuri"), &before);
    }

    #[test]
    fn test_toggle_never_touches_table() {
        let mut session = session();
        let table_before = session.table().to_vec();

        session.toggle(&CategoryKey::from("Island"), false);
        session.toggle(&CategoryKey::from("Island"), true);
        assert_eq!(session.table(), table_before.as_slice());
        assert_eq!(session.memo().len(), 8);
    }

    #[test]
    fn test_visible_counts() {
        let mut session = session();
        session.toggle(&CategoryKey::from("Safari"), false);

        let counts = session.plot().visible_counts();
        assert_eq!(counts[0], (CategoryKey::from("Safari"), 0));
        assert_eq!(counts[1], (CategoryKey::from("Coastal"), 1));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 6);
    }

    #[test]
    fn test_memo_passed_through() {
        let mut points = vec![ScatterPoint {
            hotel: "Solo".to_string(),
            year: 2000,
            score: 90.0,
            rooms: 22,
            category: CategoryKey::Undefined,
            color: "#999999".to_string(),
            radius: 2.0,
            opacity: 0.9,
            tooltip: String::new(),
        }];
        let mut memo = RadiusMemo::default();
        memo.record("Solo", 2.0);

        let memo = set_category_visible(&mut points, memo, &CategoryKey::Undefined, false);
        assert_eq!(points[0].radius, 0.0);

        let memo = set_category_visible(&mut points, memo, &CategoryKey::Undefined, true);
        assert_eq!(points[0].radius, 2.0);
        assert_eq!(memo.get("Solo"), Some(2.0));
    }
}
