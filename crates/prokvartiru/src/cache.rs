//! Bounded, time-limited memoization for lookup results.
//!
//! A [`TtlCache`] is constructed by whoever composes the autocomplete and handed to
//! the clients that use it, so two independent autocompletes never share entries by
//! accident. Entries expire after a fixed TTL and the cache never holds more than
//! its capacity.

use std::{fmt, time::Duration};

use moka::sync::Cache;
use tracing::trace;

pub struct TtlCache<V> {
    entries: Cache<String, V, ahash::RandomState>,
    capacity: usize,
    ttl: Duration,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// A `capacity` of zero disables caching entirely.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity as u64)
            .time_to_live(ttl)
            .build_with_hasher(ahash::RandomState::new());
        Self {
            entries,
            capacity,
            ttl,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let hit = self.entries.get(key);
        trace!(key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.entries.insert(key.into(), value);
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries, after pending evictions have been applied.
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        usize::try_from(self.entries.entry_count()).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
