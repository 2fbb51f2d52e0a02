use std::fmt;
use std::marker::PhantomData;

use crate::{CacheConfig, ConfigurationError, KeyArgs, SharedCache, ValidConfig};

/// A computation bound to its own [`SharedCache`].
///
/// `A` is the argument list (see [`KeyArgs`]), `R` the cached result and `F`
/// the computation. Build one with [`Memoized::new`], then call it through
/// [`call`](Memoized::call) or, for computations returning `Result`,
/// [`try_call`](Memoized::try_call).
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use recall_core::{CacheConfig, Memoized};
///
/// static CALLS: AtomicUsize = AtomicUsize::new(0);
///
/// let slow_adder = Memoized::new(
///     CacheConfig::new("slow_adder").capacity(2),
///     |&(x, y): &(i32, i32)| {
///         CALLS.fetch_add(1, Ordering::SeqCst);
///         x + y
///     },
/// )
/// .unwrap();
///
/// assert_eq!(slow_adder.call(&(2, 5)), 7);
/// assert_eq!(slow_adder.call(&(2, 5)), 7);
/// assert_eq!(CALLS.load(Ordering::SeqCst), 1);
/// ```
pub struct Memoized<A: ?Sized, R, F> {
    cache: SharedCache<R>,
    compute: F,
    _args: PhantomData<fn(&A)>,
}

impl<A: KeyArgs + ?Sized, R, F> Memoized<A, R, F> {
    /// Binds `compute` to a fresh cache, failing if `config` is invalid.
    pub fn new(config: CacheConfig, compute: F) -> Result<Self, ConfigurationError> {
        Ok(Self::from_config(config.validate()?, compute))
    }

    pub fn from_config(config: ValidConfig, compute: F) -> Self {
        Self {
            cache: SharedCache::from_config(config),
            compute,
            _args: PhantomData,
        }
    }

    /// The cache behind this computation, for inspecting residency and stats.
    pub fn cache(&self) -> &SharedCache<R> {
        &self.cache
    }
}

impl<A: KeyArgs + ?Sized, R: Clone, F> Memoized<A, R, F> {
    /// Returns the result for `args`, computing it only on a miss.
    pub fn call(&self, args: &A) -> R
    where
        F: Fn(&A) -> R,
    {
        let key = self.cache.key_for(args);
        self.cache.get_or_insert_with(key, || (self.compute)(args))
    }

    /// Returns the result for `args`; an `Err` is passed through and not cached.
    ///
    /// ```
    /// use recall_core::{CacheConfig, Memoized};
    ///
    /// let parse = Memoized::new(CacheConfig::new("parse").capacity(8), |(s,): &(String,)| {
    ///     s.parse::<u16>()
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(parse.try_call(&("80".to_string(),)), Ok(80));
    /// assert!(parse.try_call(&("eighty".to_string(),)).is_err());
    /// assert_eq!(parse.cache().len(), 1);
    /// ```
    pub fn try_call<E>(&self, args: &A) -> Result<R, E>
    where
        F: Fn(&A) -> Result<R, E>,
    {
        let key = self.cache.key_for(args);
        self.cache.try_get_or_insert_with(key, || (self.compute)(args))
    }
}

impl<A: ?Sized, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("identity", &self.cache.identity())
            .field("capacity", &self.cache.capacity())
            .field("len", &self.cache.len())
            .finish_non_exhaustive()
    }
}
