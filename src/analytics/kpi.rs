use std::collections::BTreeSet;

use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// KPI summary strip
// ---------------------------------------------------------------------------

/// Headline numbers over the filtered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSummary {
    pub total_revenue: f64,
    /// Mean margin, ignoring rows with undefined margin. `None` when no row
    /// has a defined margin.
    pub avg_margin: Option<f64>,
    /// Distinct non-null customer ids.
    pub customers: usize,
    /// Mean revenue per row. `None` for an empty view.
    pub avg_order_value: Option<f64>,
}

pub fn summarize(table: &SalesTable, indices: &[usize]) -> KpiSummary {
    if indices.is_empty() {
        return KpiSummary::default();
    }

    let mut total_revenue = 0.0;
    let mut margin_sum = 0.0;
    let mut margin_count = 0usize;
    let mut customer_ids: BTreeSet<i64> = BTreeSet::new();

    for &i in indices {
        let row = &table.rows[i];
        total_revenue += row.revenue;
        if let Some(m) = row.margin {
            margin_sum += m;
            margin_count += 1;
        }
        if let Some(cid) = row.record.customer_id {
            customer_ids.insert(cid);
        }
    }

    KpiSummary {
        total_revenue,
        avg_margin: (margin_count > 0).then(|| margin_sum / margin_count as f64),
        customers: customer_ids.len(),
        avg_order_value: Some(total_revenue / indices.len() as f64),
    }
}
