use std::collections::BTreeMap;

use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// Operations / fulfillment metrics
// ---------------------------------------------------------------------------

/// Fulfillment stats per (country, maintenance) group.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentGroup {
    pub country: Option<String>,
    pub maintenance: Option<String>,
    pub count: usize,
    /// Order-to-ship durations (days) of the group's rows, in row order.
    pub order_to_ship: Vec<f64>,
    pub mean_ship_delay: Option<f64>,
}

/// Group order-to-ship durations by country and maintenance flag. Rows
/// without a duration contribute only to `count`.
pub fn fulfillment_groups(table: &SalesTable, indices: &[usize]) -> Vec<FulfillmentGroup> {
    type Key = (Option<String>, Option<String>);
    struct Acc {
        count: usize,
        order_to_ship: Vec<f64>,
        delay_sum: f64,
        delay_count: usize,
    }

    let mut groups: BTreeMap<Key, Acc> = BTreeMap::new();
    for &i in indices {
        let row = &table.rows[i];
        let key = (row.record.country.clone(), row.record.maintenance.clone());
        let acc = groups.entry(key).or_insert(Acc {
            count: 0,
            order_to_ship: Vec::new(),
            delay_sum: 0.0,
            delay_count: 0,
        });
        acc.count += 1;
        if let Some(d) = row.order_to_ship_days {
            acc.order_to_ship.push(d as f64);
        }
        if let Some(d) = row.ship_delay {
            acc.delay_sum += d as f64;
            acc.delay_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|((country, maintenance), acc)| FulfillmentGroup {
            country,
            maintenance,
            count: acc.count,
            order_to_ship: acc.order_to_ship,
            mean_ship_delay: (acc.delay_count > 0).then(|| acc.delay_sum / acc.delay_count as f64),
        })
        .collect()
}

/// Ship delays (days) over the filtered view, for the distribution chart.
/// Negative = shipped after the due date.
pub fn ship_delay_samples(table: &SalesTable, indices: &[usize]) -> Vec<f64> {
    indices
        .iter()
        .filter_map(|&i| table.rows[i].ship_delay.map(|d| d as f64))
        .collect()
}

/// Five-number summary (min, q1, median, q3, max) for box plots.
pub fn five_number_summary(values: &[f64]) -> Option<[f64; 5]> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let quantile = |q: f64| -> f64 {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        if lo == hi {
            sorted[lo]
        } else {
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    };

    Some([
        sorted[0],
        quantile(0.25),
        quantile(0.5),
        quantile(0.75),
        sorted[sorted.len() - 1],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(
        country: Option<&str>,
        maintenance: Option<&str>,
        order_to_ship: Option<i64>,
        delay: Option<i64>,
    ) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                country: country.map(str::to_string),
                maintenance: maintenance.map(str::to_string),
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue: 0.0,
            cost: 0.0,
            profit: 0.0,
            margin: None,
            order_year_month: None,
            order_to_ship_days: order_to_ship,
            ship_delay: delay,
        }
    }

    #[test]
    fn groups_by_country_and_maintenance() {
        let table = SalesTable::from_rows(vec![
            row(Some("GERMANY"), Some("Yes"), Some(5), Some(-1)),
            row(Some("GERMANY"), Some("Yes"), Some(3), Some(1)),
            row(Some("GERMANY"), Some("No"), None, None),
            row(None, None, Some(7), Some(2)),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        let groups = fulfillment_groups(&table, &indices);

        assert_eq!(groups.len(), 3);
        let de_yes = groups
            .iter()
            .find(|g| g.country.as_deref() == Some("GERMANY") && g.maintenance.as_deref() == Some("Yes"))
            .unwrap();
        assert_eq!(de_yes.count, 2);
        assert_eq!(de_yes.order_to_ship, vec![5.0, 3.0]);
        assert_eq!(de_yes.mean_ship_delay, Some(0.0));
    }

    #[test]
    fn negative_delays_are_valid_samples() {
        let table = SalesTable::from_rows(vec![row(None, None, Some(-2), Some(-3))]);
        assert_eq!(ship_delay_samples(&table, &[0]), vec![-3.0]);
        let groups = fulfillment_groups(&table, &[0]);
        assert_eq!(groups[0].order_to_ship, vec![-2.0]);
    }

    #[test]
    fn five_number_summary_of_a_small_sample() {
        let summary = five_number_summary(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(summary, [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(five_number_summary(&[]), None);
    }

    #[test]
    fn empty_view_yields_no_groups() {
        let table = SalesTable::default();
        assert!(fulfillment_groups(&table, &[]).is_empty());
        assert!(ship_delay_samples(&table, &[]).is_empty());
    }
}
