use std::sync::atomic::{AtomicU64, Ordering};

/// Access counters kept by every [`BoundedCache`](crate::BoundedCache).
///
/// A hit is a call answered from a resident entry. A miss is a call that
/// ran the computation, whether or not its result was then stored. An
/// eviction is an entry pushed out by a newer key and is not an access.
///
/// Each counter is updated on its own with `Relaxed` ordering, so a reader
/// racing a writer may see one counter a step ahead of another.
///
/// # Examples
///
/// ```
/// use recall_core::{BoundedCache, CacheConfig};
///
/// let mut cache = BoundedCache::new(CacheConfig::new("double").capacity(1)).unwrap();
/// for x in [4, 4, 4, 9] {
///     let key = cache.key_for(&(x,));
///     cache.get_or_insert_with(key, || x * 2);
/// }
///
/// let stats = cache.stats();
/// assert_eq!(stats.hits(), 2);
/// assert_eq!(stats.misses(), 2);
/// assert_eq!(stats.evictions(), 1);
/// assert_eq!(stats.hit_rate(), 0.5);
/// ```
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Counts a call answered from the cache.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a call that ran the computation.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an entry pushed out by a newer key.
    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Every counted call, evictions excluded.
    #[inline]
    pub fn total_accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// `hits / (hits + misses)`, or `0.0` while nothing has been counted.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// `misses / (hits + misses)`, or `0.0` while nothing has been counted.
    #[inline]
    pub fn miss_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            0.0
        } else {
            self.misses() as f64 / total as f64
        }
    }

    /// Zeroes hits, misses and evictions.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            evictions: AtomicU64::new(self.evictions()),
        }
    }
}
