use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use duckdb::Connection;
use thiserror::Error;

use crate::config::AppConfig;
use crate::data::model::{EnrichedRecord, SalesRecord, SalesTable};
use crate::data::normalize::CountryMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loader failures. All of them collapse to an empty table at the
/// [`load_or_empty`] boundary; downstream code always gets a table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open source database `{url}`: {source}")]
    Connect {
        url: String,
        #[source]
        source: duckdb::Error,
    },
    #[error("invalid table name `{0}`")]
    BadTableName(String),
    #[error("query failed: {0}")]
    Query(#[from] duckdb::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch all rows of the configured fact table and enrich them.
pub fn fetch(config: &AppConfig, today: NaiveDate) -> Result<SalesTable, SourceError> {
    let countries = CountryMap::new(&config.normalize.countries);
    let conn = open(&config.source.url)?;
    read_table(&conn, &config.source.table, today, &countries)
}

/// The loader error boundary: any failure degrades to an empty table plus a
/// diagnostic message for the UI. Never propagates.
pub fn load_or_empty(config: &AppConfig, today: NaiveDate) -> (SalesTable, Option<String>) {
    match fetch(config, today) {
        Ok(table) => {
            log::info!(
                "Loaded {} sales rows ({} countries, {} categories)",
                table.len(),
                table.countries.len(),
                table.categories.len()
            );
            (table, None)
        }
        Err(e) => {
            log::error!("Failed to load sales data: {e}");
            (SalesTable::default(), Some(format!("Error loading data: {e}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Connection / query
// ---------------------------------------------------------------------------

/// Open a DuckDB connection (`:memory:` handled specially).
fn open(url: &str) -> Result<Connection, SourceError> {
    let result = if url == ":memory:" {
        Connection::open_in_memory()
    } else {
        Connection::open(Path::new(url))
    };
    result.map_err(|source| SourceError::Connect {
        url: url.to_string(),
        source,
    })
}

/// The table name comes from config; it is interpolated into SQL, so it must
/// be a plain identifier.
fn valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.chars().next().unwrap_or('0').is_ascii_digit()
}

/// Raw row as it comes off the wire: dates still text, numerics nullable.
struct RawRow {
    order_number: Option<String>,
    customer_id: Option<i64>,
    product_name: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    order_date: Option<String>,
    ship_date: Option<String>,
    due_date: Option<String>,
    birth_date: Option<String>,
    customer_creation_date: Option<String>,
    product_start_date: Option<String>,
    product_end_date: Option<String>,
    quantity: Option<f64>,
    unit_price: Option<f64>,
    unit_cost: Option<f64>,
    country: Option<String>,
    maintenance: Option<String>,
}

/// One unfiltered full-table read. Dates are cast to VARCHAR so the per-cell
/// coercion (unparseable → null, row retained) happens here rather than in
/// the database; numerics use TRY_CAST for the same reason.
pub(crate) fn read_table(
    conn: &Connection,
    table: &str,
    today: NaiveDate,
    countries: &CountryMap,
) -> Result<SalesTable, SourceError> {
    if !valid_identifier(table) {
        return Err(SourceError::BadTableName(table.to_string()));
    }

    let sql = format!(
        "SELECT \
            CAST(sls_ord_num AS VARCHAR), \
            TRY_CAST(cid AS BIGINT), \
            CAST(prd_nm AS VARCHAR), \
            CAST(cat AS VARCHAR), \
            CAST(subcat AS VARCHAR), \
            CAST(order_date AS VARCHAR), \
            CAST(ship_date AS VARCHAR), \
            CAST(due_date AS VARCHAR), \
            CAST(birth_date AS VARCHAR), \
            CAST(customer_creation_date AS VARCHAR), \
            CAST(product_start_date AS VARCHAR), \
            CAST(product_end_date AS VARCHAR), \
            TRY_CAST(sls_quantity AS DOUBLE), \
            TRY_CAST(sls_price AS DOUBLE), \
            TRY_CAST(prd_cost AS DOUBLE), \
            CAST(cntry AS VARCHAR), \
            CAST(maintenance AS VARCHAR) \
         FROM {table}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let raw_rows = stmt.query_map([], |row| {
        Ok(RawRow {
            order_number: row.get(0)?,
            customer_id: row.get(1)?,
            product_name: row.get(2)?,
            category: row.get(3)?,
            subcategory: row.get(4)?,
            order_date: row.get(5)?,
            ship_date: row.get(6)?,
            due_date: row.get(7)?,
            birth_date: row.get(8)?,
            customer_creation_date: row.get(9)?,
            product_start_date: row.get(10)?,
            product_end_date: row.get(11)?,
            quantity: row.get(12)?,
            unit_price: row.get(13)?,
            unit_cost: row.get(14)?,
            country: row.get(15)?,
            maintenance: row.get(16)?,
        })
    })?;

    let mut rows = Vec::new();
    for raw in raw_rows {
        let raw = raw?;
        rows.push(enrich(to_record(raw), today, countries));
    }
    Ok(SalesTable::from_rows(rows))
}

fn to_record(raw: RawRow) -> SalesRecord {
    SalesRecord {
        order_number: raw.order_number.unwrap_or_default(),
        customer_id: raw.customer_id,
        product_name: raw.product_name.unwrap_or_default(),
        category: raw.category,
        subcategory: raw.subcategory,
        order_date: parse_date(raw.order_date.as_deref()),
        ship_date: parse_date(raw.ship_date.as_deref()),
        due_date: parse_date(raw.due_date.as_deref()),
        birth_date: parse_date(raw.birth_date.as_deref()),
        customer_creation_date: parse_date(raw.customer_creation_date.as_deref()),
        product_start_date: parse_date(raw.product_start_date.as_deref()),
        product_end_date: parse_date(raw.product_end_date.as_deref()),
        quantity: raw.quantity.unwrap_or(0.0),
        unit_price: raw.unit_price.unwrap_or(0.0),
        unit_cost: raw.unit_cost.unwrap_or(0.0),
        country: raw.country,
        maintenance: raw.maintenance,
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a date-like cell. Datetime strings keep the date portion only;
/// anything unparseable becomes `None`.
pub(crate) fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Compute the derived columns for one row. Deterministic and total: no row
/// is ever dropped, undefined values become `None`.
pub(crate) fn enrich(
    mut record: SalesRecord,
    today: NaiveDate,
    countries: &CountryMap,
) -> EnrichedRecord {
    // Country normalization happens exactly once, here.
    record.country = record.country.as_deref().map(|c| countries.normalize(c));

    let revenue = record.quantity * record.unit_price;
    let cost = record.quantity * record.unit_cost;
    let profit = revenue - cost;
    let margin = if revenue == 0.0 {
        None
    } else {
        Some(profit / revenue * 100.0)
    };

    let customer_age = record
        .birth_date
        .map(|b| ((today - b).num_days() as f64 / 365.0) as i64);
    let order_year_month = record.order_date.map(|d| d.format("%Y-%m").to_string());
    let order_to_ship_days = match (record.order_date, record.ship_date) {
        (Some(o), Some(s)) => Some((s - o).num_days()),
        _ => None,
    };
    let ship_delay = match (record.ship_date, record.due_date) {
        (Some(s), Some(d)) => Some((d - s).num_days()),
        _ => None,
    };

    EnrichedRecord {
        record,
        customer_age,
        revenue,
        cost,
        profit,
        margin,
        order_year_month,
        order_to_ship_days,
        ship_delay,
    }
}
