use thiserror::Error;

/// Errors reported while establishing a cache.
///
/// Every variant is raised by [`CacheConfig::validate`](crate::CacheConfig::validate)
/// (and the constructors that call it). Once a cache exists, looking values up
/// or storing them never fails.
///
/// # Examples
///
/// ```
/// use recall_core::{CacheConfig, ConfigurationError};
///
/// let err = CacheConfig::new("slow_adder").capacity(0).validate().unwrap_err();
/// assert_eq!(err, ConfigurationError::ZeroCapacity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No capacity was given.
    #[error("cache capacity is required")]
    MissingCapacity,

    /// A capacity of zero could never hold a result.
    #[error("cache capacity must be a positive integer")]
    ZeroCapacity,

    /// The eviction policy name is not recognized.
    #[error("unknown eviction policy `{0}`: expected \"fifo\" or \"lru\"")]
    UnknownPolicy(String),
}
