//! Memoized orientation sets, shared between concurrently evaluated regions.

use crate::{Shape, VariantSet};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, PoisonError, RwLock,
    },
};

/// Thread-safe map from a normalized shape to its [`VariantSet`].
///
/// Lookups take a shared lock. A miss takes the exclusive lock and computes
/// the set while holding it, so each distinct shape is computed exactly once
/// for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct VariantCache {
    entries: RwLock<HashMap<Shape, Arc<VariantSet>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Counts of cache lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that computed a new variant set.
    pub misses: usize,
}

impl VariantCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the variant set of `shape`, computing and storing it if this is
    /// the first request for its normalized form.
    pub fn get_or_compute(&self, shape: &Shape) -> Arc<VariantSet> {
        let key = shape.normalize();

        if let Some(variants) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(variants);
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Another thread may have filled the entry between the two locks.
        match entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let variants = Arc::new(entry.key().variants());
                log::trace!(
                    "Computed [{}] variants for shape\n{}",
                    variants.len(),
                    entry.key()
                );

                Arc::clone(entry.insert(variants))
            }
        }
    }

    /// Number of distinct shapes cached.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Return true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
