//! Category-count bar chart.

use super::Annotation;
use crate::analysis::{category_domain, max_count};
use crate::models::{Categorized, CategoryField, CategoryKey, Counted};
use serde::Serialize;
use std::collections::HashMap;

/// One bar: a category and the number of records in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: CategoryKey,
    pub count: usize,
    pub tooltip: String,
}

/// Bar chart model: band domain, linear y-domain upper bound, bars.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub field: CategoryField,
    /// Band-scale domain in first-seen order.
    pub domain: Vec<CategoryKey>,
    /// Upper bound of the count axis.
    pub y_max: usize,
    pub bars: Vec<Bar>,
    /// Callout for the largest category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<Annotation>,
}

impl BarChart {
    /// Build the chart from an aggregated table.
    pub fn build<R: Categorized>(counted: &[Counted<R>], field: CategoryField) -> Self {
        let domain = category_domain(counted, field);

        let mut counts: HashMap<CategoryKey, usize> = HashMap::new();
        for row in counted {
            counts.entry(row.category(field)).or_insert(row.count);
        }

        let bars: Vec<Bar> = domain
            .iter()
            .map(|key| {
                let count = counts.get(key).copied().unwrap_or_default();
                Bar {
                    category: key.clone(),
                    count,
                    tooltip: bar_tooltip(field, key, count),
                }
            })
            .collect();

        let headline = top_bar(&bars).map(|bar| Annotation {
            title: bar.count.to_string(),
            label: format!("{} contains the most award-winning hotels.", bar.category),
            subject: bar.category.to_string(),
        });

        Self {
            field,
            y_max: max_count(counted),
            domain,
            bars,
            headline,
        }
    }
}

fn bar_tooltip(field: CategoryField, key: &CategoryKey, count: usize) -> String {
    format!("The {} {} has {} award-winning hotels.", field, key, count)
}

/// First bar holding the maximum count.
fn top_bar(bars: &[Bar]) -> Option<&Bar> {
    let mut best: Option<&Bar> = None;
    for bar in bars {
        if best.map_or(true, |b| bar.count > b.count) {
            best = Some(bar);
        }
    }
    best
}
