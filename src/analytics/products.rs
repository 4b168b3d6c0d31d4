use std::collections::BTreeMap;

use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// Product performance
// ---------------------------------------------------------------------------

/// Per-product rollup over the filtered view, sorted by revenue descending.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPerformance {
    pub product_name: String,
    /// First non-null category seen for the product.
    pub category: Option<String>,
    pub total_revenue: f64,
    /// Mean margin over rows with a defined margin.
    pub mean_margin: Option<f64>,
    pub total_quantity: f64,
}

pub fn product_performance(table: &SalesTable, indices: &[usize]) -> Vec<ProductPerformance> {
    struct Acc {
        category: Option<String>,
        revenue: f64,
        margin_sum: f64,
        margin_count: usize,
        quantity: f64,
    }

    let mut by_product: BTreeMap<String, Acc> = BTreeMap::new();
    for &i in indices {
        let row = &table.rows[i];
        let acc = by_product
            .entry(row.record.product_name.clone())
            .or_insert(Acc {
                category: None,
                revenue: 0.0,
                margin_sum: 0.0,
                margin_count: 0,
                quantity: 0.0,
            });
        acc.revenue += row.revenue;
        acc.quantity += row.record.quantity;
        if let Some(m) = row.margin {
            acc.margin_sum += m;
            acc.margin_count += 1;
        }
        if acc.category.is_none() {
            acc.category = row.record.category.clone();
        }
    }

    let mut products: Vec<ProductPerformance> = by_product
        .into_iter()
        .map(|(product_name, acc)| ProductPerformance {
            product_name,
            category: acc.category,
            total_revenue: acc.revenue,
            mean_margin: (acc.margin_count > 0).then(|| acc.margin_sum / acc.margin_count as f64),
            total_quantity: acc.quantity,
        })
        .collect();
    products.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(product: &str, category: Option<&str>, revenue: f64, margin: Option<f64>) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                product_name: product.to_string(),
                category: category.map(str::to_string),
                quantity: 1.0,
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue,
            cost: 0.0,
            profit: 0.0,
            margin,
            order_year_month: None,
            order_to_ship_days: None,
            ship_delay: None,
        }
    }

    #[test]
    fn aggregates_per_product_sorted_by_revenue() {
        let table = SalesTable::from_rows(vec![
            row("Helmet", Some("Accessories"), 30.0, Some(20.0)),
            row("Road-150", Some("Bikes"), 200.0, Some(60.0)),
            row("Road-150", None, 100.0, None),
        ]);
        let indices: Vec<usize> = (0..table.len()).collect();
        let products = product_performance(&table, &indices);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_name, "Road-150");
        assert_eq!(products[0].total_revenue, 300.0);
        assert_eq!(products[0].mean_margin, Some(60.0));
        assert_eq!(products[0].total_quantity, 2.0);
        assert_eq!(products[0].category.as_deref(), Some("Bikes"));
        assert_eq!(products[1].product_name, "Helmet");
    }

    #[test]
    fn empty_view_yields_no_products() {
        let table = SalesTable::default();
        assert!(product_performance(&table, &[]).is_empty());
    }
}
