use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// Customer segmentation (recency / frequency / monetary)
// ---------------------------------------------------------------------------

/// Per-customer rollup over the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    pub customer_id: i64,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,
    /// Order-line count.
    pub frequency: usize,
    /// Total revenue (the segmentation's monetary value).
    pub monetary: f64,
    pub profit: f64,
    /// Days since the most recent order.
    pub recency: Option<i64>,
    /// Segment bin, 0 = lowest revenue tier. Assigned by
    /// [`assign_segments`].
    pub segment: usize,
}

/// Aggregate the filtered view per customer and assign segments. Rows with a
/// null customer id are skipped. Output is ordered by customer id.
pub fn customer_metrics(
    table: &SalesTable,
    indices: &[usize],
    today: NaiveDate,
    bins: usize,
) -> Vec<CustomerMetrics> {
    let mut by_customer: BTreeMap<i64, CustomerMetrics> = BTreeMap::new();

    for &i in indices {
        let row = &table.rows[i];
        let Some(cid) = row.record.customer_id else {
            continue;
        };
        let entry = by_customer.entry(cid).or_insert(CustomerMetrics {
            customer_id: cid,
            first_order: None,
            last_order: None,
            frequency: 0,
            monetary: 0.0,
            profit: 0.0,
            recency: None,
            segment: 0,
        });
        entry.frequency += 1;
        entry.monetary += row.revenue;
        entry.profit += row.profit;
        if let Some(d) = row.record.order_date {
            entry.first_order = Some(entry.first_order.map_or(d, |f| f.min(d)));
            entry.last_order = Some(entry.last_order.map_or(d, |l| l.max(d)));
        }
    }

    let mut metrics: Vec<CustomerMetrics> = by_customer.into_values().collect();
    for m in &mut metrics {
        m.recency = m.last_order.map(|d| (today - d).num_days());
    }
    assign_segments(&mut metrics, bins);
    metrics
}

/// Partition customers into `bins` equal-width bins over total revenue,
/// lowest-revenue bin first. A zero-width range (all customers identical)
/// degenerates to everyone in the lowest bin.
pub fn assign_segments(metrics: &mut [CustomerMetrics], bins: usize) {
    let bins = bins.max(1);
    let Some(min) = metrics.iter().map(|m| m.monetary).reduce(f64::min) else {
        return;
    };
    let max = metrics.iter().map(|m| m.monetary).fold(min, f64::max);
    let width = (max - min) / bins as f64;

    for m in metrics {
        m.segment = if width == 0.0 {
            0
        } else {
            (((m.monetary - min) / width) as usize).min(bins - 1)
        };
    }
}

/// Customer count per segment bin, for the distribution chart.
pub fn segment_counts(metrics: &[CustomerMetrics], bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins.max(1)];
    for m in metrics {
        if let Some(slot) = counts.get_mut(m.segment) {
            *slot += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(cid: Option<i64>, revenue: f64, order_date: Option<&str>) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                customer_id: cid,
                order_date: order_date.map(|d| d.parse().unwrap()),
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue,
            cost: 0.0,
            profit: revenue / 2.0,
            margin: None,
            order_year_month: None,
            order_to_ship_days: None,
            ship_delay: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rolls_up_per_customer_and_computes_recency() {
        let table = SalesTable::from_rows(vec![
            row(Some(1), 100.0, Some("2024-01-05")),
            row(Some(1), 50.0, Some("2024-03-01")),
            row(Some(2), 30.0, None),
            row(None, 999.0, Some("2024-02-01")),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        let metrics = customer_metrics(&table, &indices, date("2024-03-11"), 5);

        assert_eq!(metrics.len(), 2);
        let first = &metrics[0];
        assert_eq!(first.customer_id, 1);
        assert_eq!(first.frequency, 2);
        assert_eq!(first.monetary, 150.0);
        assert_eq!(first.profit, 75.0);
        assert_eq!(first.first_order, Some(date("2024-01-05")));
        assert_eq!(first.last_order, Some(date("2024-03-01")));
        assert_eq!(first.recency, Some(10));

        let second = &metrics[1];
        assert_eq!(second.customer_id, 2);
        assert_eq!(second.last_order, None);
        assert_eq!(second.recency, None);
    }

    #[test]
    fn five_distinct_revenues_fill_five_bins_in_order() {
        let table = SalesTable::from_rows(
            (1..=5)
                .map(|i| row(Some(i), (i * 10) as f64, Some("2024-01-01")))
                .collect(),
        );
        let indices: Vec<usize> = (0..table.len()).collect();
        let metrics = customer_metrics(&table, &indices, date("2024-02-01"), 5);

        let segments: Vec<usize> = metrics.iter().map(|m| m.segment).collect();
        assert_eq!(segments, vec![0, 1, 2, 3, 4]);
        assert_eq!(segment_counts(&metrics, 5), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn identical_revenues_degenerate_to_the_lowest_bin() {
        let table = SalesTable::from_rows(
            (1..=4)
                .map(|i| row(Some(i), 42.0, Some("2024-01-01")))
                .collect(),
        );
        let indices: Vec<usize> = (0..table.len()).collect();
        let metrics = customer_metrics(&table, &indices, date("2024-02-01"), 5);

        assert!(metrics.iter().all(|m| m.segment == 0));
        assert_eq!(segment_counts(&metrics, 5), vec![4, 0, 0, 0, 0]);
    }

    #[test]
    fn empty_view_yields_no_metrics() {
        let table = SalesTable::default();
        assert!(customer_metrics(&table, &[], date("2024-02-01"), 5).is_empty());
    }
}
