use std::sync::Arc;
use std::time::{Duration, Instant};

use super::model::SalesTable;

// ---------------------------------------------------------------------------
// Time-bounded table snapshot cache
// ---------------------------------------------------------------------------

/// Holds the enriched table for a bounded time window. The snapshot is an
/// `Arc` replaced wholesale on expiry, never mutated in place, so every
/// reader observes a complete, consistent table.
pub struct TableCache {
    ttl: Duration,
    snapshot: Option<(Arc<SalesTable>, Instant)>,
}

/// Result of a cache read.
pub struct CacheOutcome {
    pub table: Arc<SalesTable>,
    /// Diagnostic from the load, if one actually happened and failed.
    pub diagnostic: Option<String>,
    pub reloaded: bool,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        TableCache {
            ttl,
            snapshot: None,
        }
    }

    /// Return the cached snapshot if it is still fresh, otherwise run `load`
    /// and replace the snapshot with its result. A cache hit is structurally
    /// identical to a cold load by construction: it is the same `Arc`.
    pub fn get_or_load<F>(&mut self, load: F) -> CacheOutcome
    where
        F: FnOnce() -> (SalesTable, Option<String>),
    {
        if let Some((table, loaded_at)) = &self.snapshot {
            if loaded_at.elapsed() < self.ttl {
                return CacheOutcome {
                    table: Arc::clone(table),
                    diagnostic: None,
                    reloaded: false,
                };
            }
        }

        let (table, diagnostic) = load();
        let table = Arc::new(table);
        self.snapshot = Some((Arc::clone(&table), Instant::now()));
        CacheOutcome {
            table,
            diagnostic,
            reloaded: true,
        }
    }

    /// Drop the snapshot so the next read reloads (the UI's Reload button).
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_counted(counter: &mut usize) -> (SalesTable, Option<String>) {
        *counter += 1;
        (SalesTable::default(), None)
    }

    #[test]
    fn fresh_read_is_a_hit_returning_the_same_snapshot() {
        let mut cache = TableCache::new(Duration::from_secs(3600));
        let mut loads = 0;

        let first = cache.get_or_load(|| load_counted(&mut loads));
        let second = cache.get_or_load(|| load_counted(&mut loads));

        assert!(first.reloaded);
        assert!(!second.reloaded);
        assert!(Arc::ptr_eq(&first.table, &second.table));
        assert_eq!(loads, 1);
    }

    #[test]
    fn expired_snapshot_is_replaced_wholesale() {
        let mut cache = TableCache::new(Duration::ZERO);
        let mut loads = 0;

        cache.get_or_load(|| load_counted(&mut loads));
        let outcome = cache.get_or_load(|| load_counted(&mut loads));

        assert!(outcome.reloaded);
        assert_eq!(loads, 2);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let mut cache = TableCache::new(Duration::from_secs(3600));
        let mut loads = 0;

        cache.get_or_load(|| load_counted(&mut loads));
        cache.invalidate();
        let outcome = cache.get_or_load(|| load_counted(&mut loads));

        assert!(outcome.reloaded);
        assert_eq!(loads, 2);
    }
}
