use std::collections::BTreeMap;

use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// Sales overview aggregates
// ---------------------------------------------------------------------------

/// Revenue per `YYYY-MM` bucket, ascending by month. Rows without an order
/// date have no bucket and are skipped.
pub fn monthly_revenue(table: &SalesTable, indices: &[usize]) -> Vec<(String, f64)> {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for &i in indices {
        let row = &table.rows[i];
        if let Some(month) = &row.order_year_month {
            *by_month.entry(month.clone()).or_insert(0.0) += row.revenue;
        }
    }
    by_month.into_iter().collect()
}

/// Top `n` categories by total revenue, descending.
pub fn top_categories(table: &SalesTable, indices: &[usize], n: usize) -> Vec<(String, f64)> {
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    for &i in indices {
        let row = &table.rows[i];
        if let Some(cat) = &row.record.category {
            *by_category.entry(cat.clone()).or_insert(0.0) += row.revenue;
        }
    }
    let mut categories: Vec<(String, f64)> = by_category.into_iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(&a.1));
    categories.truncate(n);
    categories
}

/// Per-country revenue, mean margin, and distinct customer count (the
/// geographic performance view).
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPerformance {
    pub country: String,
    pub revenue: f64,
    pub mean_margin: Option<f64>,
    pub customers: usize,
}

pub fn country_performance(table: &SalesTable, indices: &[usize]) -> Vec<CountryPerformance> {
    struct Acc {
        revenue: f64,
        margin_sum: f64,
        margin_count: usize,
        customers: std::collections::BTreeSet<i64>,
    }

    let mut by_country: BTreeMap<String, Acc> = BTreeMap::new();
    for &i in indices {
        let row = &table.rows[i];
        let Some(country) = &row.record.country else {
            continue;
        };
        let acc = by_country.entry(country.clone()).or_insert(Acc {
            revenue: 0.0,
            margin_sum: 0.0,
            margin_count: 0,
            customers: Default::default(),
        });
        acc.revenue += row.revenue;
        if let Some(m) = row.margin {
            acc.margin_sum += m;
            acc.margin_count += 1;
        }
        if let Some(cid) = row.record.customer_id {
            acc.customers.insert(cid);
        }
    }

    by_country
        .into_iter()
        .map(|(country, acc)| CountryPerformance {
            country,
            revenue: acc.revenue,
            mean_margin: (acc.margin_count > 0).then(|| acc.margin_sum / acc.margin_count as f64),
            customers: acc.customers.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(
        month: Option<&str>,
        category: Option<&str>,
        country: Option<&str>,
        cid: Option<i64>,
        revenue: f64,
    ) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                category: category.map(str::to_string),
                country: country.map(str::to_string),
                customer_id: cid,
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue,
            cost: 0.0,
            profit: 0.0,
            margin: Some(50.0),
            order_year_month: month.map(str::to_string),
            order_to_ship_days: None,
            ship_delay: None,
        }
    }

    #[test]
    fn monthly_revenue_buckets_ascending() {
        let table = SalesTable::from_rows(vec![
            row(Some("2024-02"), None, None, None, 10.0),
            row(Some("2024-01"), None, None, None, 5.0),
            row(Some("2024-02"), None, None, None, 20.0),
            row(None, None, None, None, 99.0),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        assert_eq!(
            monthly_revenue(&table, &indices),
            vec![("2024-01".to_string(), 5.0), ("2024-02".to_string(), 30.0)]
        );
    }

    #[test]
    fn top_categories_sorted_and_truncated() {
        let table = SalesTable::from_rows(vec![
            row(None, Some("Bikes"), None, None, 100.0),
            row(None, Some("Accessories"), None, None, 40.0),
            row(None, Some("Clothing"), None, None, 60.0),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        let top = top_categories(&table, &indices, 2);
        assert_eq!(
            top,
            vec![
                ("Bikes".to_string(), 100.0),
                ("Clothing".to_string(), 60.0),
            ]
        );
    }

    #[test]
    fn country_performance_counts_distinct_customers() {
        let table = SalesTable::from_rows(vec![
            row(None, None, Some("GERMANY"), Some(1), 10.0),
            row(None, None, Some("GERMANY"), Some(1), 10.0),
            row(None, None, Some("GERMANY"), Some(2), 10.0),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        let perf = country_performance(&table, &indices);
        assert_eq!(perf.len(), 1);
        assert_eq!(perf[0].revenue, 30.0);
        assert_eq!(perf[0].customers, 2);
        assert_eq!(perf[0].mean_margin, Some(50.0));
    }

    #[test]
    fn empty_view_yields_empty_aggregates() {
        let table = SalesTable::default();
        assert!(monthly_revenue(&table, &[]).is_empty());
        assert!(top_categories(&table, &[], 5).is_empty());
        assert!(country_performance(&table, &[]).is_empty());
    }
}
