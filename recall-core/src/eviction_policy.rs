use std::fmt;
use std::str::FromStr;

use crate::ConfigurationError;

/// Decides which resident entry makes room when a full cache admits a new key.
///
/// # Variants
///
/// * `FIFO` - **First In, First Out** eviction policy (default)
///   - The oldest inserted entry is removed first
///   - A cache hit does NOT change an entry's position
///   - O(1) on hits and evictions
///
/// * `LRU` - **Least Recently Used** eviction policy
///   - The least recently accessed entry is removed first
///   - A cache hit moves the entry to the "most recent" position
///   - O(n) on hits for reordering
///
/// # Examples
///
/// ```
/// use recall_core::EvictionPolicy;
///
/// assert_eq!(EvictionPolicy::default(), EvictionPolicy::FIFO);
///
/// let lru: EvictionPolicy = "LRU".parse().unwrap();
/// assert_eq!(lru, EvictionPolicy::LRU);
///
/// assert!("random".parse::<EvictionPolicy>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvictionPolicy {
    #[default]
    FIFO,
    LRU,
}

impl EvictionPolicy {
    /// Whether a cache hit moves the key to the back of the order queue.
    pub const fn refreshes_on_hit(self) -> bool {
        matches!(self, EvictionPolicy::LRU)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EvictionPolicy::FIFO => "fifo",
            EvictionPolicy::LRU => "lru",
        }
    }
}

/// Case-insensitive: `"fifo"` or `"lru"`.
impl FromStr for EvictionPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(EvictionPolicy::FIFO),
            "lru" => Ok(EvictionPolicy::LRU),
            _ => Err(ConfigurationError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
