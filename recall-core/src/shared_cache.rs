use std::collections::HashMap;
use std::convert::Infallible;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    BoundedCache, CacheConfig, CacheKey, ConfigurationError, EvictionPolicy, KeyArgs, ValidConfig,
};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// Per-key gate held while a value for that key is being computed.
type Flight = Arc<Mutex<()>>;

/// A [`BoundedCache`] that many threads can use at once.
///
/// All operations take `&self`. The cache state sits behind a
/// `parking_lot::Mutex` that is only held for bookkeeping, never while the
/// wrapped computation runs, so a memoized function may call itself
/// recursively.
///
/// # Single flight
///
/// Callers that miss on the same key at the same time do not all run the
/// computation. They queue on a per-key gate: the first one computes and
/// stores the result, the others wake up, find the value and return it. If
/// the first caller fails (an `Err` or a panic) nothing is stored and the
/// next caller in line computes for itself. Callers on different keys never
/// wait for each other.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::thread;
/// use recall_core::{CacheConfig, SharedCache};
///
/// let cache = Arc::new(SharedCache::new(CacheConfig::new("square").capacity(8)).unwrap());
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let cache = Arc::clone(&cache);
///         let calls = Arc::clone(&calls);
///         thread::spawn(move || {
///             let key = cache.key_for(&(12,));
///             cache.get_or_insert_with(key, || {
///                 calls.fetch_add(1, Ordering::SeqCst);
///                 144
///             })
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     assert_eq!(handle.join().unwrap(), 144);
/// }
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug)]
pub struct SharedCache<R> {
    inner: Mutex<BoundedCache<R>>,
    in_flight: Mutex<HashMap<CacheKey, Flight>>,
}

impl<R> SharedCache<R> {
    pub fn new(config: CacheConfig) -> Result<Self, ConfigurationError> {
        Ok(Self::from_config(config.validate()?))
    }

    pub fn from_config(config: ValidConfig) -> Self {
        Self::wrap(BoundedCache::from_config(config))
    }

    pub fn from_parts(
        identity: impl Into<String>,
        capacity: NonZeroUsize,
        policy: EvictionPolicy,
    ) -> Self {
        Self::wrap(BoundedCache::from_parts(identity, capacity, policy))
    }

    fn wrap(cache: BoundedCache<R>) -> Self {
        Self {
            inner: Mutex::new(cache),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn identity(&self) -> String {
        self.inner.lock().identity().to_string()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.inner.lock().capacity()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.inner.lock().policy()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().contains(key)
    }

    /// Resident keys, next eviction candidate first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.inner.lock().keys().cloned().collect()
    }

    /// A snapshot of the counters.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats().clone()
    }

    pub fn key_for<A: KeyArgs + ?Sized>(&self, args: &A) -> CacheKey {
        self.inner.lock().key_for(args)
    }

    /// Runs `f` while holding the gate for `key`, then drops the gate if no
    /// other caller is waiting on it.
    fn with_flight<T>(&self, key: &CacheKey, f: impl FnOnce() -> T) -> T {
        let flight = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        // Declared before the gate guard so it drops after it, unwinding included.
        let release = FlightRelease {
            in_flight: &self.in_flight,
            key,
            flight,
        };
        let _gate = release.flight.lock();
        f()
    }
}

/// Removes a finished flight from the gate map once nobody else holds it.
struct FlightRelease<'a> {
    in_flight: &'a Mutex<HashMap<CacheKey, Flight>>,
    key: &'a CacheKey,
    flight: Flight,
}

impl Drop for FlightRelease<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        // One reference is ours, one is the map's.
        if Arc::strong_count(&self.flight) == 2 {
            if let Some(current) = in_flight.get(self.key) {
                if Arc::ptr_eq(current, &self.flight) {
                    in_flight.remove(self.key);
                }
            }
        }
    }
}

impl<R: Clone> SharedCache<R> {
    /// A resident value, counted as a hit. A missing key is not counted.
    pub fn get(&self, key: &CacheKey) -> Option<R> {
        self.inner.lock().touch(key).cloned()
    }

    /// Reads a resident value without counting an access or reordering.
    pub fn peek(&self, key: &CacheKey) -> Option<R> {
        self.inner.lock().peek(key).cloned()
    }

    /// See [`BoundedCache::get_or_insert_with`]; concurrent misses on one key
    /// run `compute` once.
    pub fn get_or_insert_with<F>(&self, key: CacheKey, compute: F) -> R
    where
        F: FnOnce() -> R,
    {
        match self.try_get_or_insert_with(key, || Ok::<R, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// See [`BoundedCache::try_get_or_insert_with`]; concurrent misses on one
    /// key run `compute` once unless it fails.
    pub fn try_get_or_insert_with<F, E>(&self, key: CacheKey, compute: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        if let Some(value) = self.inner.lock().touch(&key).cloned() {
            return Ok(value);
        }

        self.with_flight(&key, || {
            // Another caller may have stored the value while we waited.
            {
                let mut inner = self.inner.lock();
                if let Some(value) = inner.touch(&key).cloned() {
                    trace!(cache = %inner.identity(), key = %key, "served by concurrent caller");
                    return Ok(value);
                }
                inner.note_miss(&key);
            }

            match compute() {
                Ok(value) => {
                    self.inner.lock().store(key.clone(), value.clone());
                    Ok(value)
                }
                Err(err) => {
                    debug!(
                        cache = %self.identity(),
                        key = %key,
                        "computation failed; result not cached"
                    );
                    Err(err)
                }
            }
        })
    }
}
