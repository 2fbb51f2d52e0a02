use std::num::NonZeroUsize;

use crate::{ConfigurationError, EvictionPolicy};

/// Capacity used by the `#[cache]` attribute when none is given.
pub const DEFAULT_CAPACITY: usize = 10;

/// Settings for one cache, checked once by [`validate`](CacheConfig::validate).
///
/// `identity` names the wrapped computation and prefixes every key, so two
/// computations never share entries even when their arguments match.
///
/// # Examples
///
/// ```
/// use recall_core::{CacheConfig, ConfigurationError, EvictionPolicy};
///
/// let config = CacheConfig::new("slow_adder").capacity(2).validate().unwrap();
/// assert_eq!(config.capacity().get(), 2);
/// assert_eq!(config.policy(), EvictionPolicy::FIFO);
///
/// assert_eq!(
///     CacheConfig::new("slow_adder").validate().unwrap_err(),
///     ConfigurationError::MissingCapacity,
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    identity: String,
    capacity: Option<usize>,
    policy: EvictionPolicy,
}

impl CacheConfig {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            capacity: None,
            policy: EvictionPolicy::default(),
        }
    }

    /// Maximum number of resident entries. Must be positive.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parses the policy by name, e.g. from a configuration file.
    pub fn policy_name(self, name: &str) -> Result<Self, ConfigurationError> {
        Ok(self.policy(name.parse()?))
    }

    pub fn validate(self) -> Result<ValidConfig, ConfigurationError> {
        let capacity = self.capacity.ok_or(ConfigurationError::MissingCapacity)?;
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigurationError::ZeroCapacity)?;
        Ok(ValidConfig {
            identity: self.identity,
            capacity,
            policy: self.policy,
        })
    }
}

/// A configuration that passed validation; caches are built from these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidConfig {
    identity: String,
    capacity: NonZeroUsize,
    policy: EvictionPolicy,
}

impl ValidConfig {
    pub fn new(identity: impl Into<String>, capacity: NonZeroUsize, policy: EvictionPolicy) -> Self {
        Self {
            identity: identity.into(),
            capacity,
            policy,
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

    pub(crate) fn into_parts(self) -> (String, NonZeroUsize, EvictionPolicy) {
        (self.identity, self.capacity, self.policy)
    }
}

impl TryFrom<CacheConfig> for ValidConfig {
    type Error = ConfigurationError;

    fn try_from(config: CacheConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = CacheConfig::new("f")
            .capacity(3)
            .policy(EvictionPolicy::LRU)
            .validate()
            .unwrap();
        assert_eq!(config.identity(), "f");
        assert_eq!(config.capacity().get(), 3);
        assert_eq!(config.policy(), EvictionPolicy::LRU);
    }

    #[test]
    fn test_missing_capacity() {
        assert_eq!(
            CacheConfig::new("f").validate(),
            Err(ConfigurationError::MissingCapacity)
        );
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            CacheConfig::new("f").capacity(0).validate(),
            Err(ConfigurationError::ZeroCapacity)
        );
    }

    #[test]
    fn test_policy_by_name() {
        let config = CacheConfig::new("f")
            .capacity(1)
            .policy_name("LRU")
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.policy(), EvictionPolicy::LRU);

        assert_eq!(
            CacheConfig::new("f").policy_name("clock"),
            Err(ConfigurationError::UnknownPolicy("clock".to_string()))
        );
    }

    #[test]
    fn test_try_from() {
        let valid = ValidConfig::try_from(CacheConfig::new("f").capacity(DEFAULT_CAPACITY));
        assert_eq!(valid.map(|c| c.capacity().get()), Ok(10));
    }
}
