use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use crate::data::model::{CellValue, SalesTable, EXPLORER_COLUMNS};

// ---------------------------------------------------------------------------
// Explorer sort + export
// ---------------------------------------------------------------------------

/// Sort order for the data explorer.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    /// One of [`EXPLORER_COLUMNS`].
    pub column: String,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            column: EXPLORER_COLUMNS[0].to_string(),
            ascending: true,
        }
    }
}

/// Stable sort of the filtered indices by one explorer column. Rows that
/// compare equal keep their filtered order.
pub fn sorted_indices(table: &SalesTable, indices: &[usize], sort: &SortSpec) -> Vec<usize> {
    let mut out = indices.to_vec();
    out.sort_by(|&a, &b| {
        let ord = table.rows[a]
            .cell(&sort.column)
            .cmp(&table.rows[b].cell(&sort.column));
        if sort.ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    out
}

/// Serialize the given rows as CSV. Dates render as plain calendar dates,
/// nulls as empty fields.
pub fn to_csv(table: &SalesTable, indices: &[usize]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPLORER_COLUMNS)
        .context("writing CSV header")?;
    for &i in indices {
        let row = &table.rows[i];
        let cells: Vec<String> = EXPLORER_COLUMNS
            .iter()
            .map(|col| row.cell(col).to_string())
            .collect();
        writer.write_record(&cells).context("writing CSV row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV")?;
    String::from_utf8(bytes).context("CSV is not valid UTF-8")
}

/// Serialize the given rows as a pretty-printed JSON array of objects.
/// Numbers stay numbers, dates become `"YYYY-MM-DD"` strings, nulls `null`.
pub fn to_json(table: &SalesTable, indices: &[usize]) -> Result<String> {
    let records: Vec<JsonValue> = indices
        .iter()
        .map(|&i| {
            let row = &table.rows[i];
            let mut obj = Map::new();
            for col in EXPLORER_COLUMNS {
                obj.insert(col.to_string(), row.cell(col).to_json());
            }
            JsonValue::Object(obj)
        })
        .collect();
    serde_json::to_string_pretty(&records).context("serializing JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnrichedRecord, SalesRecord};

    fn row(order_number: &str, revenue: f64, order_date: Option<&str>) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord {
                order_number: order_number.to_string(),
                order_date: order_date.map(|d| d.parse().unwrap()),
                ..SalesRecord::default()
            },
            customer_age: None,
            revenue,
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
            row("SO2", 50.0, Some("2024-02-01")),
            row("SO1", 100.0, None),
            row("SO3", 50.0, Some("2024-01-01")),
        ])
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let t = table();
        let sort = SortSpec {
            column: "revenue".to_string(),
            ascending: true,
        };
        // SO2 and SO3 tie on revenue and keep their filtered order.
        assert_eq!(sorted_indices(&t, &[0, 1, 2], &sort), vec![0, 2, 1]);

        let desc = SortSpec {
            column: "revenue".to_string(),
            ascending: false,
        };
        assert_eq!(sorted_indices(&t, &[0, 1, 2], &desc), vec![1, 0, 2]);
    }

    #[test]
    fn csv_renders_dates_plain_and_nulls_empty() {
        let t = table();
        let csv = to_csv(&t, &[0, 1]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("order_number,customer_id,"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("SO2,,"));
        assert!(first.contains("2024-02-01"));
        assert!(!first.contains(':'), "no time component in exported dates");
    }

    #[test]
    fn json_keeps_numbers_and_nulls_typed() {
        let t = table();
        let json = to_json(&t, &[1]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rec = &parsed.as_array().unwrap()[0];
        assert_eq!(rec["order_number"], "SO1");
        assert_eq!(rec["revenue"], 100.0);
        assert!(rec["order_date"].is_null());
    }

    #[test]
    fn empty_view_exports_header_only() {
        let t = SalesTable::default();
        let csv = to_csv(&t, &[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert_eq!(to_json(&t, &[]).unwrap(), "[]");
    }
}
