use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::SalesTable;

// ---------------------------------------------------------------------------
// Filter predicate set
// ---------------------------------------------------------------------------

/// The active filter predicates: an inclusive order-date range plus optional
/// country/category subsets. An empty subset means "no restriction on that
/// dimension".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

/// Initialise a [`FilterState`] covering the whole table: date bounds at the
/// data's min/max order date, no dimension restrictions.
pub fn init_filter_state(table: &SalesTable) -> FilterState {
    let (start, end) = match table.order_date_range {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    FilterState {
        start_date: start,
        end_date: end,
        countries: BTreeSet::new(),
        categories: BTreeSet::new(),
    }
}

/// Return indices of rows that pass all active predicates (logical AND).
///
/// * Date range is inclusive on both bounds; rows without an order date are
///   excluded whenever a bound is set.
/// * An empty country/category subset is vacuously true; a non-empty subset
///   is a membership test (rows with a null dimension value fail it).
///
/// The output preserves the row order of the enriched table.
pub fn filtered_indices(table: &SalesTable, filters: &FilterState) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let r = &row.record;

            if filters.start_date.is_some() || filters.end_date.is_some() {
                let Some(order_date) = r.order_date else {
                    return false;
                };
                if let Some(start) = filters.start_date {
                    if order_date < start {
                        return false;
                    }
                }
                if let Some(end) = filters.end_date {
                    if order_date > end {
                        return false;
                    }
                }
            }

            if !filters.countries.is_empty() {
                match &r.country {
                    Some(c) if filters.countries.contains(c) => {}
                    _ => return false,
                }
            }

            if !filters.categories.is_empty() {
                match &r.category {
                    Some(c) if filters.categories.contains(c) => {}
                    _ => return false,
                }
            }

            true
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(order_date: Option<&str>, country: Option<&str>, category: Option<&str>) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                order_date: order_date.map(|d| d.parse().unwrap()),
                country: country.map(str::to_string),
                category: category.map(str::to_string),
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue: 0.0,
            cost: 0.0,
            profit: 0.0,
            margin: None,
            order_year_month: None,
            order_to_ship_days: None,
            ship_delay: None,
        }
    }

    fn table() -> SalesTable {
        SalesTable::from_rows(vec![
            row(Some("2024-01-10"), Some("UNITED STATES"), Some("Bikes")),
            row(Some("2024-02-20"), Some("GERMANY"), Some("Accessories")),
            row(Some("2024-03-05"), Some("GERMANY"), Some("Bikes")),
            row(None, Some("UNITED STATES"), None),
        ])
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn date_range_is_inclusive_on_both_bounds() {
        let t = table();
        let filters = FilterState {
            start_date: Some(date("2024-01-10")),
            end_date: Some(date("2024-02-20")),
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1]);
    }

    #[test]
    fn empty_subset_equals_full_subset() {
        let t = table();
        let unrestricted = FilterState::default();
        let all_countries = FilterState {
            countries: t.countries.clone(),
            ..FilterState::default()
        };
        // Every row carries a country, so selecting all of them matches the
        // unrestricted view exactly.
        assert_eq!(
            filtered_indices(&t, &unrestricted),
            vec![0, 1, 2, 3]
        );
        assert_eq!(filtered_indices(&t, &all_countries), vec![0, 1, 2, 3]);
    }

    #[test]
    fn predicates_compose_with_and_semantics() {
        let t = table();
        let filters = FilterState {
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-12-31")),
            countries: ["GERMANY".to_string()].into_iter().collect(),
            categories: ["Bikes".to_string()].into_iter().collect(),
        };
        assert_eq!(filtered_indices(&t, &filters), vec![2]);
    }

    #[test]
    fn null_order_date_fails_an_active_date_predicate() {
        let t = table();
        let filters = FilterState {
            start_date: Some(date("2024-01-01")),
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn null_dimension_fails_a_non_empty_subset() {
        let t = table();
        let filters = FilterState {
            categories: ["Bikes".to_string()].into_iter().collect(),
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&t, &filters), vec![0, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = table();
        let filters = FilterState {
            countries: ["GERMANY".to_string()].into_iter().collect(),
            ..FilterState::default()
        };
        let once = filtered_indices(&t, &filters);
        let kept = SalesTable::from_rows(once.iter().map(|&i| t.rows[i].clone()).collect());
        let twice = filtered_indices(&kept, &filters);
        assert_eq!(twice, (0..once.len()).collect::<Vec<_>>());
    }

    #[test]
    fn empty_table_filters_to_empty() {
        let t = SalesTable::default();
        assert!(filtered_indices(&t, &FilterState::default()).is_empty());
    }
}
