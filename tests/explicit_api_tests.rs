//! The explicit cache API re-exported by the facade crate.

use recall::{
    BoundedCache, CacheConfig, ConfigurationError, EvictionPolicy, KeyArgs, KeyBuilder, Memoized,
    SharedCache, DEFAULT_CAPACITY,
};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_configuration_errors() {
    assert_eq!(
        CacheConfig::new("f").validate().unwrap_err(),
        ConfigurationError::MissingCapacity
    );
    assert_eq!(
        SharedCache::<u8>::new(CacheConfig::new("f").capacity(0)).unwrap_err(),
        ConfigurationError::ZeroCapacity
    );
    assert_eq!(
        CacheConfig::new("f").policy_name("mru").unwrap_err(),
        ConfigurationError::UnknownPolicy("mru".to_string())
    );
    assert_eq!(
        ConfigurationError::ZeroCapacity.to_string(),
        "cache capacity must be a positive integer"
    );
}

#[test]
fn test_default_capacity_constant() {
    let cache = BoundedCache::<u8>::new(CacheConfig::new("f").capacity(DEFAULT_CAPACITY)).unwrap();
    assert_eq!(cache.capacity().get(), 10);
    assert_eq!(cache.policy(), EvictionPolicy::FIFO);
}

#[test]
fn test_bounded_cache_slow_adder_sequence() {
    let mut cache = BoundedCache::new(CacheConfig::new("slow_adder").capacity(2)).unwrap();
    let calls = Cell::new(0);
    let mut slow_adder = |x: i32, y: i32| {
        let key = cache.key_for(&(x, y));
        cache.get_or_insert_with(key, || {
            calls.set(calls.get() + 1);
            x + y
        })
    };

    let mut counts = Vec::new();
    for (x, y) in [(2, 5), (3, 5), (2, 5), (4, 5)] {
        slow_adder(x, y);
        counts.push(calls.get());
    }
    assert_eq!(counts, [1, 2, 2, 3]);

    let resident: Vec<&str> = cache.keys().map(|k| k.as_str()).collect();
    assert_eq!(resident, ["slow_adder(3|5|;)", "slow_adder(4|5|;)"]);
}

struct Query<'a> {
    table: &'a str,
    limit: u32,
    descending: bool,
}

impl KeyArgs for Query<'_> {
    fn write_key(&self, key: &mut KeyBuilder) {
        key.positional(self.table)
            .named("limit", &self.limit)
            .named("descending", &self.descending);
    }
}

#[test]
fn test_named_argument_order_is_irrelevant() {
    let a = KeyBuilder::new("query")
        .positional("users")
        .named("limit", &10)
        .named("descending", &true)
        .finish();
    let b = KeyBuilder::new("query")
        .positional("users")
        .named("descending", &true)
        .named("limit", &10)
        .finish();
    assert_eq!(a, b);

    let cache = SharedCache::<Vec<u32>>::new(CacheConfig::new("query").capacity(4)).unwrap();
    let query = Query { table: "users", limit: 10, descending: true };
    assert_eq!(cache.key_for(&query), a);
}

#[test]
fn test_memoized_with_named_arguments() {
    let calls = AtomicUsize::new(0);
    let run = Memoized::new(CacheConfig::new("query").capacity(4), |q: &Query<'_>| {
        calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<u32> = (1..=q.limit).collect();
        if q.descending {
            rows.reverse();
        }
        rows
    })
    .unwrap();

    let q = Query { table: "users", limit: 3, descending: true };
    assert_eq!(run.call(&q), vec![3, 2, 1]);
    assert_eq!(run.call(&q), vec![3, 2, 1]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shared_cache_across_threads() {
    let cache = Arc::new(SharedCache::new(CacheConfig::new("cube").capacity(32)).unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            thread::spawn(move || {
                for x in 0..16u64 {
                    let key = cache.key_for(&(x,));
                    let value = cache.get_or_insert_with(key, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        x * x * x
                    });
                    assert_eq!(value, x * x * x);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 16);
    assert_eq!(cache.len(), 16);
}

#[test]
#[cfg(feature = "stats")]
fn test_stats_through_memoized() {
    let square = Memoized::new(CacheConfig::new("square").capacity(1), |&(x,): &(u32,)| x * x)
        .unwrap();

    square.call(&(2,)); // miss
    square.call(&(2,)); // hit
    square.call(&(3,)); // miss, evicts 2

    let stats = square.cache().stats();
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.misses(), 2);
    assert_eq!(stats.evictions(), 1);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
}
