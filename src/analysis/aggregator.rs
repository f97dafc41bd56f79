//! Category aggregation and statistics.
//!
//! This module provides the counting pass shared by every chart: how many
//! records fall into each category, the ordered category domain, and
//! numeric extents for scatter axes.

use crate::models::{Categorized, CategoryField, CategoryKey, Counted};
use std::collections::{HashMap, HashSet};

/// Count records per category value.
pub fn count_by_category<R: Categorized>(
    records: &[R],
    field: CategoryField,
) -> HashMap<CategoryKey, usize> {
    let mut counts: HashMap<CategoryKey, usize> = HashMap::new();

    for record in records {
        *counts.entry(record.category(field)).or_default() += 1;
    }

    counts
}

/// Attach to every record the number of records sharing its category value.
///
/// Counts are complete before any is assigned, so each record carries the
/// final total for its category rather than a running tally. Output order
/// matches input order.
pub fn aggregate_by_category<R: Categorized>(
    records: Vec<R>,
    field: CategoryField,
) -> Vec<Counted<R>> {
    let counts = count_by_category(&records, field);

    records
        .into_iter()
        .map(|record| {
            let count = counts
                .get(&record.category(field))
                .copied()
                .unwrap_or_default();
            Counted { record, count }
        })
        .collect()
}

/// Distinct category values in first-seen order.
pub fn category_domain<R: Categorized>(records: &[R], field: CategoryField) -> Vec<CategoryKey> {
    let mut seen = HashSet::new();
    let mut domain = Vec::new();

    for record in records {
        let key = record.category(field);
        if seen.insert(key.clone()) {
            domain.push(key);
        }
    }

    domain
}

/// Category counts in domain (first-seen) order.
pub fn category_counts<R: Categorized>(
    records: &[R],
    field: CategoryField,
) -> Vec<(CategoryKey, usize)> {
    let counts = count_by_category(records, field);

    category_domain(records, field)
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or_default();
            (key, count)
        })
        .collect()
}

/// Largest derived count, or 0 for an empty table.
pub fn max_count<R>(counted: &[Counted<R>]) -> usize {
    counted.iter().map(|c| c.count).max().unwrap_or(0)
}

/// Minimum and maximum of a numeric accessor, `None` for empty input.
///
/// Values that do not compare (NaN) are skipped.
pub fn extent<R, T, F>(records: &[R], value: F) -> Option<(T, T)>
where
    T: PartialOrd + Copy,
    F: Fn(&R) -> T,
{
    let mut bounds: Option<(T, T)> = None;

    for v in records.iter().map(value) {
        if v.partial_cmp(&v).is_none() {
            continue;
        }
        bounds = match bounds {
            None => Some((v, v)),
            Some((lo, hi)) => Some((
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )),
        };
    }

    bounds
}

/// Number of records in the undefined bucket for a field.
pub fn undefined_count<R: Categorized>(records: &[R], field: CategoryField) -> usize {
    records
        .iter()
        .filter(|r| r.category(field).is_undefined())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{hotel, HotelRecord};

    fn regions(values: &[Option<&str>]) -> Vec<HotelRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, r)| hotel(&format!("Hotel {}", i), *r))
            .collect()
    }

    fn counts_of<R>(counted: &[Counted<R>]) -> Vec<usize> {
        counted.iter().map(|c| c.count).collect()
    }

    #[test]
    fn test_aggregate_counts() {
        let records = regions(&[Some("A"), Some("A"), Some("B")]);
        let counted = aggregate_by_category(records, CategoryField::Region);
        assert_eq!(counts_of(&counted), vec![2, 2, 1]);
    }

    #[test]
    fn test_aggregate_empty() {
        let counted = aggregate_by_category(Vec::<HotelRecord>::new(), CategoryField::Region);
        assert!(counted.is_empty());
        assert_eq!(max_count(&counted), 0);
    }

    #[test]
    fn test_aggregate_preserves_order() {
        let records = regions(&[Some("B"), Some("A"), Some("B")]);
        let counted = aggregate_by_category(records, CategoryField::Region);
        let names: Vec<_> = counted.iter().map(|c| c.record.hotel.as_str()).collect();
        assert_eq!(names, vec!["Hotel 0", "Hotel 1", "Hotel 2"]);
    }

    #[test]
    fn test_counts_independent_of_order() {
        let forward = regions(&[Some("A"), Some("B"), Some("A"), Some("C"), Some("A")]);
        let mut reversed = forward.clone();
        reversed.reverse();

        for counted in [
            aggregate_by_category(forward, CategoryField::Region),
            aggregate_by_category(reversed, CategoryField::Region),
        ] {
            for c in &counted {
                let expected = counted
                    .iter()
                    .filter(|o| o.record.region == c.record.region)
                    .count();
                assert_eq!(c.count, expected);
            }
        }
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = regions(&[Some("A"), Some("B"), Some("A")]);
        let once = aggregate_by_category(records, CategoryField::Region);
        let first = counts_of(&once);
        let twice = aggregate_by_category(once, CategoryField::Region);
        assert_eq!(counts_of(&twice), first);
    }

    #[test]
    fn test_missing_region_counted_separately() {
        let records = regions(&[Some("A"), None, Some("A")]);
        let counted = aggregate_by_category(records, CategoryField::Region);
        assert_eq!(counts_of(&counted), vec![2, 1, 2]);

        let counts = count_by_category(&counted, CategoryField::Region);
        assert_eq!(counts.get(&CategoryKey::Undefined), Some(&1));
        assert_eq!(counts.get(&CategoryKey::from("A")), Some(&2));
        assert_eq!(undefined_count(&counted, CategoryField::Region), 1);
    }

    #[test]
    fn test_category_domain_first_seen() {
        let records = regions(&[Some("B"), Some("A"), Some("B")]);
        assert_eq!(
            category_domain(&records, CategoryField::Region),
            vec![CategoryKey::from("B"), CategoryKey::from("A")]
        );
    }

    #[test]
    fn test_category_counts_in_domain_order() {
        let records = regions(&[Some("B"), None, Some("A"), Some("B")]);
        assert_eq!(
            category_counts(&records, CategoryField::Region),
            vec![
                (CategoryKey::from("B"), 2),
                (CategoryKey::Undefined, 1),
                (CategoryKey::from("A"), 1),
            ]
        );
    }

    #[test]
    fn test_extent() {
        let mut records = regions(&[Some("A"), Some("A"), Some("A")]);
        records[0].year = 1834;
        records[1].year = 2013;
        records[2].year = 1925;
        records[1].score = f64::NAN;

        assert_eq!(extent(&records, |r| r.year), Some((1834, 2013)));
        assert_eq!(extent(&records, |r| r.score), Some((90.0, 90.0)));
        assert_eq!(extent(&Vec::<HotelRecord>::new(), |r| r.year), None);
    }
}
