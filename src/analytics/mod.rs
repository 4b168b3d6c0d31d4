//! Aggregation views over the filtered table.
//!
//! Every function here takes the enriched table plus the filtered row
//! indices, never mutates its input, and returns an empty/neutral result for
//! an empty view. They are recomputed synchronously on every filter change.

pub mod customers;
pub mod kpi;
pub mod operations;
pub mod products;
pub mod sales;
