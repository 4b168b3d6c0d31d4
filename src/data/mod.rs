//! Data layer: core types, loading, enrichment, and filtering.
//!
//! Architecture:
//! ```text
//!  DuckDB: dashboard_data
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  SELECT * → parse dates → normalize → derive columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ SalesTable  │  Vec<EnrichedRecord>, dimension indices
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply date/country/category predicates → row indices
//!   └──────────┘
//! ```
//!
//! The enriched table is rebuilt at most once per cache window (see
//! [`cache`]); the filtered index list is recomputed synchronously on every
//! filter change. Everything downstream of `filter` is read-only.

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
