//! Invalidation-keyed cache of filter results.
//!
//! Entries are keyed by the exact (dataset identity, filter value) pair, so a
//! new dataset or a changed specification can never be served a stale view.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::dataset::{Dataset, DatasetId};

use super::engine::{View, select};
use super::spec::FilterSpec;

/// Default number of cached views.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset: DatasetId,
    records: usize,
    filter: FilterSpec,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that ran the filter engine.
    pub misses: u64,
}

/// Bounded FIFO cache of filter results.
#[derive(Debug)]
pub struct ViewCache {
    capacity: usize,
    entries: HashMap<CacheKey, Arc<[usize]>>,
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ViewCache {
    /// Create a cache holding at most `capacity` views. Zero disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached view for `(dataset, spec)` or compute and store it.
    pub fn apply<'a>(&mut self, dataset: &'a Dataset, spec: &FilterSpec) -> View<'a> {
        let key = CacheKey {
            dataset: dataset.id(),
            records: dataset.len(),
            filter: spec.clone(),
        };

        if let Some(indices) = self.entries.get(&key) {
            self.stats.hits += 1;
            debug!(dataset_id = %key.dataset, "View cache hit");
            return View::from_indices(dataset, Arc::clone(indices));
        }

        self.stats.misses += 1;
        debug!(dataset_id = %key.dataset, "View cache miss");
        let view = View::from_indices(dataset, select(dataset, spec));

        if self.capacity > 0 {
            if self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.entries.insert(key.clone(), Arc::clone(view.indices()));
            self.order.push_back(key);
        }

        view
    }

    /// Drop every entry belonging to `dataset`.
    pub fn invalidate(&mut self, dataset: DatasetId) {
        self.order.retain(|key| key.dataset != dataset);
        self.entries.retain(|key, _| key.dataset != dataset);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Number of cached views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
