use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// SalesRecord – one raw fact row (one order line)
// ---------------------------------------------------------------------------

/// A raw sales fact row as read from the source table, after per-cell date
/// parsing. Unparseable dates are `None`; the row itself is always kept.
#[derive(Debug, Clone, Default)]
pub struct SalesRecord {
    // Identity
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,

    // Dates (nullable)
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub customer_creation_date: Option<NaiveDate>,
    pub product_start_date: Option<NaiveDate>,
    pub product_end_date: Option<NaiveDate>,

    // Measures
    pub quantity: f64,
    pub unit_price: f64,
    pub unit_cost: f64,

    // Dimensions
    pub country: Option<String>,
    pub maintenance: Option<String>,
}

// ---------------------------------------------------------------------------
// EnrichedRecord – raw row + derived business columns
// ---------------------------------------------------------------------------

/// A fact row with the derived columns computed once at load time.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub record: SalesRecord,

    /// Whole years between birth date and the load date.
    pub customer_age: Option<i64>,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Profit / Revenue × 100; `None` when revenue is zero.
    pub margin: Option<f64>,
    /// Order date truncated to month, `"YYYY-MM"`.
    pub order_year_month: Option<String>,
    /// Ship date − order date in days. Negative values are kept as-is;
    /// they are a data-quality signal, not an error.
    pub order_to_ship_days: Option<i64>,
    /// Due date − ship date in days. Negative = shipped late.
    pub ship_delay: Option<i64>,
}

// ---------------------------------------------------------------------------
// SalesTable – the complete enriched table
// ---------------------------------------------------------------------------

/// The full enriched table with pre-computed dimension indices.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    /// All enriched rows, in source order.
    pub rows: Vec<EnrichedRecord>,
    /// Sorted set of distinct non-null normalized countries.
    pub countries: BTreeSet<String>,
    /// Sorted set of distinct non-null categories.
    pub categories: BTreeSet<String>,
    /// Min/max order date over rows that have one.
    pub order_date_range: Option<(NaiveDate, NaiveDate)>,
}

impl SalesTable {
    /// Build dimension indices from the enriched rows.
    pub fn from_rows(rows: Vec<EnrichedRecord>) -> Self {
        let mut countries = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut range: Option<(NaiveDate, NaiveDate)> = None;

        for row in &rows {
            if let Some(c) = &row.record.country {
                countries.insert(c.clone());
            }
            if let Some(c) = &row.record.category {
                categories.insert(c.clone());
            }
            if let Some(d) = row.record.order_date {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                    None => (d, d),
                });
            }
        }

        SalesTable {
            rows,
            countries,
            categories,
            order_date_range: range,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single typed cell in the data explorer
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value used for sorting and export of the
/// explorer table. Kept `Ord` so sorting by any column is total.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

// -- Manual Eq/Ord: nulls sort first, floats use total_cmp --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
                Date(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl CellValue {
    fn from_opt_text(v: &Option<String>) -> Self {
        match v {
            Some(s) => CellValue::Text(s.clone()),
            None => CellValue::Null,
        }
    }

    fn from_opt_date(v: Option<NaiveDate>) -> Self {
        match v {
            Some(d) => CellValue::Date(d),
            None => CellValue::Null,
        }
    }

    fn from_opt_int(v: Option<i64>) -> Self {
        match v {
            Some(i) => CellValue::Integer(i),
            None => CellValue::Null,
        }
    }

    /// JSON rendering for the export path: numbers stay numbers, dates
    /// become plain calendar-date strings, nulls become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Null => JsonValue::Null,
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Integer(i) => JsonValue::from(*i),
            CellValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            CellValue::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Explorer column catalog
// ---------------------------------------------------------------------------

/// Ordered column list shown in the data explorer and written by the
/// exporters.
pub const EXPLORER_COLUMNS: &[&str] = &[
    "order_number",
    "customer_id",
    "product_name",
    "category",
    "subcategory",
    "country",
    "maintenance",
    "order_date",
    "ship_date",
    "due_date",
    "quantity",
    "unit_price",
    "unit_cost",
    "revenue",
    "cost",
    "profit",
    "margin",
    "customer_age",
    "order_year_month",
    "order_to_ship_days",
    "ship_delay",
];

impl EnrichedRecord {
    /// Typed cell accessor for the explorer/export column catalog.
    pub fn cell(&self, column: &str) -> CellValue {
        let r = &self.record;
        match column {
            "order_number" => CellValue::Text(r.order_number.clone()),
            "customer_id" => CellValue::from_opt_int(r.customer_id),
            "product_name" => CellValue::Text(r.product_name.clone()),
            "category" => CellValue::from_opt_text(&r.category),
            "subcategory" => CellValue::from_opt_text(&r.subcategory),
            "country" => CellValue::from_opt_text(&r.country),
            "maintenance" => CellValue::from_opt_text(&r.maintenance),
            "order_date" => CellValue::from_opt_date(r.order_date),
            "ship_date" => CellValue::from_opt_date(r.ship_date),
            "due_date" => CellValue::from_opt_date(r.due_date),
            "quantity" => CellValue::Float(r.quantity),
            "unit_price" => CellValue::Float(r.unit_price),
            "unit_cost" => CellValue::Float(r.unit_cost),
            "revenue" => CellValue::Float(self.revenue),
            "cost" => CellValue::Float(self.cost),
            "profit" => CellValue::Float(self.profit),
            "margin" => match self.margin {
                Some(m) => CellValue::Float(m),
                None => CellValue::Null,
            },
            "customer_age" => CellValue::from_opt_int(self.customer_age),
            "order_year_month" => CellValue::from_opt_text(&self.order_year_month),
            "order_to_ship_days" => CellValue::from_opt_int(self.order_to_ship_days),
            "ship_delay" => CellValue::from_opt_int(self.ship_delay),
            _ => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: Option<&str>, category: Option<&str>, date: Option<&str>) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                country: country.map(str::to_string),
                category: category.map(str::to_string),
                order_date: date.map(|d| d.parse().unwrap()),
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

    #[test]
    fn from_rows_builds_dimension_indices_skipping_nulls() {
        let table = SalesTable::from_rows(vec![
            record(Some("GERMANY"), Some("Bikes"), Some("2024-03-01")),
            record(None, Some("Bikes"), Some("2024-01-10")),
            record(Some("UNITED STATES"), None, None),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.countries.iter().collect::<Vec<_>>(),
            vec!["GERMANY", "UNITED STATES"]
        );
        assert_eq!(table.categories.iter().collect::<Vec<_>>(), vec!["Bikes"]);
        assert_eq!(
            table.order_date_range,
            Some(("2024-01-10".parse().unwrap(), "2024-03-01".parse().unwrap()))
        );
    }

    #[test]
    fn empty_table_has_no_date_range() {
        let table = SalesTable::from_rows(Vec::new());
        assert!(table.is_empty());
        assert!(table.order_date_range.is_none());
    }

    #[test]
    fn cell_values_sort_with_nulls_first() {
        let mut cells = vec![
            CellValue::Float(2.0),
            CellValue::Null,
            CellValue::Float(-1.0),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Float(-1.0),
                CellValue::Float(2.0),
            ]
        );
    }

    #[test]
    fn date_cells_render_without_time_component() {
        let d: NaiveDate = "2024-01-15".parse().unwrap();
        assert_eq!(CellValue::Date(d).to_string(), "2024-01-15");
        assert_eq!(CellValue::Date(d).to_json(), JsonValue::from("2024-01-15"));
    }
}
