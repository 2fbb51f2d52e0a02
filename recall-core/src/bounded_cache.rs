use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::utils::{evict_front, move_key_to_end};
use crate::{
    CacheConfig, CacheKey, ConfigurationError, EvictionPolicy, KeyArgs, KeyBuilder, ValidConfig,
};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// A bounded map from call keys to computed results, owned by one caller.
///
/// Holds at most `capacity` entries. When a new key arrives at a full cache
/// the entry at the front of the order queue is evicted: under
/// [`EvictionPolicy::FIFO`] (the default) that is the oldest inserted entry,
/// and hits never change the order; under [`EvictionPolicy::LRU`] a hit moves
/// its key to the back.
///
/// A resident value is never replaced. It stays exactly as computed until
/// the key is evicted. There is no operation to remove entries by hand.
///
/// For a cache shared between threads see [`SharedCache`](crate::SharedCache).
///
/// # Examples
///
/// ```
/// use recall_core::{BoundedCache, CacheConfig};
///
/// let mut cache = BoundedCache::new(CacheConfig::new("slow_adder").capacity(2)).unwrap();
/// let mut calls = 0;
/// let mut add = |cache: &mut BoundedCache<i32>, x: i32, y: i32| {
///     let key = cache.key_for(&(x, y));
///     cache.get_or_insert_with(key, || {
///         calls += 1;
///         x + y
///     })
/// };
///
/// assert_eq!(add(&mut cache, 2, 5), 7); // miss
/// assert_eq!(add(&mut cache, 3, 5), 8); // miss
/// assert_eq!(add(&mut cache, 2, 5), 7); // hit
/// assert_eq!(add(&mut cache, 4, 5), 9); // miss, evicts (2, 5)
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug)]
pub struct BoundedCache<R> {
    identity: String,
    capacity: NonZeroUsize,
    policy: EvictionPolicy,
    map: HashMap<CacheKey, R>,
    /// Resident keys, front = next eviction candidate.
    order: VecDeque<CacheKey>,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

/// Upper bound on the slots reserved up front; larger caches grow on demand.
const PREALLOCATE_LIMIT: usize = 64;

impl<R> BoundedCache<R> {
    /// Validates `config` and builds an empty cache.
    pub fn new(config: CacheConfig) -> Result<Self, ConfigurationError> {
        Ok(Self::from_config(config.validate()?))
    }

    pub fn from_config(config: ValidConfig) -> Self {
        let (identity, capacity, policy) = config.into_parts();
        Self::from_parts(identity, capacity, policy)
    }

    /// Builds an empty cache from already valid parts.
    pub fn from_parts(
        identity: impl Into<String>,
        capacity: NonZeroUsize,
        policy: EvictionPolicy,
    ) -> Self {
        Self {
            identity: identity.into(),
            capacity,
            policy,
            map: HashMap::with_capacity(capacity.get().min(PREALLOCATE_LIMIT)),
            order: VecDeque::with_capacity(capacity.get().min(PREALLOCATE_LIMIT)),
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.map.contains_key(key)
    }

    /// Reads a resident value without counting an access or reordering.
    pub fn peek(&self, key: &CacheKey) -> Option<&R> {
        self.map.get(key)
    }

    /// Resident keys, next eviction candidate first.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> + '_ {
        self.order.iter()
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The key of a call with `args` to this cache's computation.
    pub fn key_for<A: KeyArgs + ?Sized>(&self, args: &A) -> CacheKey {
        let mut builder = KeyBuilder::new(self.identity.as_str());
        args.write_key(&mut builder);
        builder.finish()
    }

    /// Looks a key up, counting a hit or a miss.
    ///
    /// Under LRU a hit moves the key to the back of the order queue.
    pub fn get(&mut self, key: &CacheKey) -> Option<&R> {
        if self.map.contains_key(key) {
            self.touch(key)
        } else {
            self.note_miss(key);
            None
        }
    }

    /// Like [`get`](Self::get) but a missing key is not counted.
    pub(crate) fn touch(&mut self, key: &CacheKey) -> Option<&R> {
        if !self.map.contains_key(key) {
            return None;
        }
        #[cfg(feature = "stats")]
        self.stats.record_hit();
        trace!(cache = %self.identity, key = %key, "cache hit");
        if self.policy.refreshes_on_hit() {
            move_key_to_end(&mut self.order, key);
        }
        self.map.get(key)
    }

    pub(crate) fn note_miss(&self, key: &CacheKey) {
        #[cfg(feature = "stats")]
        self.stats.record_miss();
        trace!(cache = %self.identity, key = %key, "cache miss");
    }

    /// Stores a freshly computed value, evicting one entry if the cache is full.
    ///
    /// Returns the evicted key. If `key` is already resident the stored value
    /// is kept and nothing changes.
    pub fn store(&mut self, key: CacheKey, value: R) -> Option<CacheKey> {
        if self.map.contains_key(&key) {
            return None;
        }

        let evicted = if self.map.len() >= self.capacity.get() {
            evict_front(&mut self.map, &mut self.order)
        } else {
            None
        };
        if let Some(evicted) = &evicted {
            #[cfg(feature = "stats")]
            self.stats.record_eviction();
            debug!(
                cache = %self.identity,
                policy = %self.policy,
                evicted = %evicted,
                "evicted entry to stay within capacity"
            );
        }

        self.order.push_back(key.clone());
        self.map.insert(key, value);
        evicted
    }
}

impl<R: Clone> BoundedCache<R> {
    /// [`get`](Self::get) returning an owned copy.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<R> {
        self.get(key).cloned()
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its result.
    ///
    /// On a hit `compute` is not called. On a miss the result is stored
    /// (possibly evicting one entry) and returned. If `compute` panics the
    /// cache is left unchanged.
    pub fn get_or_insert_with<F>(&mut self, key: CacheKey, compute: F) -> R
    where
        F: FnOnce() -> R,
    {
        if let Some(value) = self.lookup(&key) {
            return value;
        }
        let value = compute();
        self.store(key, value.clone());
        value
    }

    /// Fallible [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// An `Err` is returned unchanged and nothing is stored, so the next call
    /// with the same key runs `compute` again.
    ///
    /// ```
    /// use recall_core::{BoundedCache, CacheConfig};
    ///
    /// let mut cache = BoundedCache::new(CacheConfig::new("parse").capacity(4)).unwrap();
    ///
    /// let key = cache.key_for(&("x".to_string(),));
    /// let err = cache.try_get_or_insert_with(key.clone(), || "x".parse::<i32>());
    /// assert!(err.is_err());
    /// assert!(!cache.contains(&key));
    ///
    /// let key = cache.key_for(&("42".to_string(),));
    /// assert_eq!(cache.try_get_or_insert_with(key.clone(), || "42".parse::<i32>()), Ok(42));
    /// assert!(cache.contains(&key));
    /// ```
    pub fn try_get_or_insert_with<F, E>(&mut self, key: CacheKey, compute: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }
        let result = compute();
        self.store_result(key, &result);
        result
    }

    /// Stores a copy of the `Ok` value of `result`; an `Err` is only logged.
    ///
    /// For callers that must run the computation while the cache is not
    /// borrowed, e.g. a recursive function whose cache lives in a
    /// `RefCell`.
    pub fn store_result<E>(&mut self, key: CacheKey, result: &Result<R, E>) -> Option<CacheKey> {
        match result {
            Ok(value) => self.store(key, value.clone()),
            Err(_) => {
                debug!(cache = %self.identity, key = %key, "computation failed; result not cached");
                None
            }
        }
    }
}
