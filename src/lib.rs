//! # Recall
//!
//! Bounded memoization for Rust.
//!
//! A memoized function remembers the results of its most recent distinct
//! calls. Repeating a call returns the stored result without running the
//! function again; once the cache holds `capacity` results, storing a new one
//! evicts the oldest (FIFO, or LRU when asked for).
//!
//! ## Features
//!
//! - **One attribute**: put `#[cache]` on a function or method
//! - **Bounded**: a fixed capacity, validated before anything runs
//! - **Canonical keys**: the function's identity plus its arguments, with
//!   separators escaped so distinct calls never share a key
//! - **Result-aware**: only `Ok` values are stored, failures are retried
//! - **Thread-safe**: the default global scope runs the body once per key even
//!   when many threads miss together
//!
//! ## Quick Start
//!
//! ```rust
//! use recall::cache;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! static CALLS: AtomicUsize = AtomicUsize::new(0);
//!
//! #[cache(capacity = 2)]
//! fn slow_adder(x: i32, y: i32) -> i32 {
//!     CALLS.fetch_add(1, Ordering::SeqCst);
//!     x + y
//! }
//!
//! assert_eq!(slow_adder(2, 5), 7);
//! assert_eq!(slow_adder(3, 5), 8);
//! assert_eq!(slow_adder(2, 5), 7); // served from the cache
//! assert_eq!(CALLS.load(Ordering::SeqCst), 2);
//!
//! assert_eq!(slow_adder(4, 5), 9); // evicts the result for (2, 5)
//! assert_eq!(CALLS.load(Ordering::SeqCst), 3);
//! ```
//!
//! ## Custom Cache Keys
//!
//! Argument types need a key. Use the `Debug` output:
//!
//! ```rust
//! use recall::{cache, DefaultCacheableKey};
//!
//! #[derive(Debug, Clone)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl DefaultCacheableKey for Point {}
//!
//! #[cache(capacity = 64)]
//! fn manhattan(a: Point, b: Point) -> i64 {
//!     (a.x - b.x).abs() + (a.y - b.y).abs()
//! }
//!
//! assert_eq!(manhattan(Point { x: 0, y: 0 }, Point { x: 3, y: -4 }), 7);
//! ```
//!
//! Or say exactly what identifies a value:
//!
//! ```rust
//! use recall::CacheableKey;
//!
//! struct Document {
//!     id: u64,
//!     body: String,
//! }
//!
//! impl CacheableKey for Document {
//!     fn to_cache_key(&self) -> String {
//!         format!("doc:{}", self.id)
//!     }
//! }
//! ```
//!
//! ## Failures Are Not Cached
//!
//! ```rust
//! use recall::cache;
//!
//! #[cache(capacity = 16)]
//! fn parse_port(raw: String) -> Result<u16, String> {
//!     raw.trim().parse().map_err(|e| format!("bad port {:?}: {}", raw, e))
//! }
//!
//! assert!(parse_port("http".to_string()).is_err());
//! assert_eq!(parse_port(" 8080 ".to_string()), Ok(8080));
//! ```
//!
//! ## Explicit Caches
//!
//! Without the attribute, wrap a closure in a [`Memoized`], or drive a
//! [`BoundedCache`] / [`SharedCache`] by hand. Invalid settings surface as a
//! [`ConfigurationError`]:
//!
//! ```rust
//! use recall::{CacheConfig, ConfigurationError, Memoized};
//!
//! let square = Memoized::new(CacheConfig::new("square").capacity(100), |&(x,): &(u64,)| x * x)
//!     .unwrap();
//! assert_eq!(square.call(&(12,)), 144);
//!
//! let missing = Memoized::<(u64,), u64, _>::new(CacheConfig::new("square"), |&(x,): &(u64,)| x);
//! assert_eq!(missing.unwrap_err(), ConfigurationError::MissingCapacity);
//! ```
//!
//! ## Logging
//!
//! Caches emit [`tracing`](https://docs.rs/tracing) events: hits and misses
//! at `trace`, evictions and uncached failures at `debug`. No subscriber is
//! installed by the library.

pub use recall_core::*;
pub use recall_macros::cache;
