//! # Recall Core
//!
//! Building blocks for the `recall` memoization library.
//!
//! A memoized computation owns one bounded cache. Every call is turned into a
//! [`CacheKey`] (the computation's identity plus its positional and named
//! arguments); a hit returns the stored result, a miss runs the computation
//! and stores what it returned. When a full cache admits a new key, the
//! oldest entry leaves first.
//!
//! ## Features
//!
//! - **Canonical keys**: named arguments are ordered by name, positional
//!   arguments keep their order, separators inside values are escaped
//! - **Bounded storage**: capacity is checked once, at configuration time
//! - **Eviction policies**: FIFO (the default) and LRU
//! - **Failure awareness**: an `Err` result is returned to the caller and never cached
//! - **Thread safety**: [`SharedCache`] runs one computation per key at a time
//!   and never holds its lock while computing, so recursion is fine
//! - **Statistics**: hit, miss and eviction counters behind the `stats` feature
//!
//! ## Module Organization
//!
//! - [`cache_key`] - Key encoding and [`KeyBuilder`]
//! - [`keys`] - Traits turning argument values into key components
//! - [`config`] - Cache configuration and validation
//! - [`eviction_policy`] - FIFO and LRU
//! - [`bounded_cache`] - Single-owner bounded cache
//! - [`shared_cache`] - Thread-safe bounded cache with single-flight misses
//! - [`memoized`] - A computation bundled with its cache
//!
pub mod bounded_cache;
pub mod cache_key;
pub mod config;
mod error;
pub mod eviction_policy;
pub mod keys;
pub mod memoized;
pub mod shared_cache;

pub mod utils;

#[cfg(feature = "stats")]
mod stats;

pub use bounded_cache::BoundedCache;
pub use cache_key::{CacheKey, KeyBuilder};
pub use config::{CacheConfig, ValidConfig, DEFAULT_CAPACITY};
pub use error::ConfigurationError;
pub use eviction_policy::EvictionPolicy;
pub use keys::{CacheableKey, DefaultCacheableKey, KeyArgs};
pub use memoized::Memoized;
pub use shared_cache::SharedCache;

#[cfg(feature = "stats")]
pub use stats::CacheStats;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
