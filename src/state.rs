use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::config::AppConfig;
use crate::data::cache::TableCache;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::loader;
use crate::data::model::SalesTable;
use crate::export::SortSpec;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard tabs, mirroring the analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Sales,
    Customers,
    Products,
    Operations,
    Explorer,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Sales,
        Tab::Customers,
        Tab::Products,
        Tab::Operations,
        Tab::Explorer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Sales => "Sales Pulse",
            Tab::Customers => "Customers",
            Tab::Products => "Products",
            Tab::Operations => "Operations",
            Tab::Explorer => "Data Explorer",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    cache: TableCache,

    /// Current enriched-table snapshot (always present, possibly empty).
    pub table: Arc<SalesTable>,

    /// Active filter predicates.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub active_tab: Tab,

    /// Data-explorer sort.
    pub sort: SortSpec,

    /// Diagnostic shown in the UI when the last load failed.
    pub status_message: Option<String>,

    /// Whether filters were initialised from a non-empty table yet.
    initialized: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_seconds);
        let mut state = AppState {
            config,
            cache: TableCache::new(ttl),
            table: Arc::new(SalesTable::default()),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            active_tab: Tab::Sales,
            sort: SortSpec::default(),
            status_message: None,
            initialized: false,
        };
        state.refresh();
        state
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Read the table through the cache. Called every frame: a fresh
    /// snapshot is a cheap hit; an expired one triggers the synchronous
    /// reload and a wholesale snapshot swap.
    pub fn refresh(&mut self) {
        let config = self.config.clone();
        let outcome = self
            .cache
            .get_or_load(|| loader::load_or_empty(&config, Self::today()));
        let reloaded = outcome.reloaded;
        self.table = outcome.table;
        if !reloaded {
            return;
        }

        self.status_message = outcome.diagnostic;
        if !self.initialized && !self.table.is_empty() {
            // First successful load: date bounds come from the data.
            self.filters = init_filter_state(&self.table);
            self.initialized = true;
        }
        self.refilter();
    }

    /// The Reload button: drop the snapshot and load again now.
    pub fn force_reload(&mut self) {
        self.cache.invalidate();
        self.refresh();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.table, &self.filters);
    }

    pub fn segment_labels(&self) -> &[String] {
        &self.config.segments.labels
    }

    /// Toggle one country in the subset. An empty subset means no
    /// restriction.
    pub fn toggle_country(&mut self, value: &str) {
        if !self.filters.countries.remove(value) {
            self.filters.countries.insert(value.to_string());
        }
        self.refilter();
    }

    pub fn toggle_category(&mut self, value: &str) {
        if !self.filters.categories.remove(value) {
            self.filters.categories.insert(value.to_string());
        }
        self.refilter();
    }

    pub fn clear_countries(&mut self) {
        self.filters.countries.clear();
        self.refilter();
    }

    pub fn clear_categories(&mut self) {
        self.filters.categories.clear();
        self.refilter();
    }
}
