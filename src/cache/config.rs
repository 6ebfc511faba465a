use std::time::Duration;

use crate::check::CheckTier;
use crate::constants::{
    CACHE_TTL_BASIC_SECS, CACHE_TTL_CONTENT_SECS, CACHE_TTL_DEEP_SECS, CACHE_TTL_FUNCTIONAL_SECS,
    DEFAULT_CACHE_CLEANUP_INTERVAL_SECS, DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_CACHE_MAX_ENTRIES,
};

/// Base TTL per tier, before the status factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtlConfig {
    pub basic: Duration,
    pub functional: Duration,
    pub content: Duration,
    pub deep: Duration,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            basic: Duration::from_secs(CACHE_TTL_BASIC_SECS),
            functional: Duration::from_secs(CACHE_TTL_FUNCTIONAL_SECS),
            content: Duration::from_secs(CACHE_TTL_CONTENT_SECS),
            deep: Duration::from_secs(CACHE_TTL_DEEP_SECS),
        }
    }
}

impl CacheTtlConfig {
    pub fn base(&self, tier: CheckTier) -> Duration {
        match tier {
            CheckTier::Basic => self.basic,
            CheckTier::Functional => self.functional,
            CheckTier::Content => self.content,
            CheckTier::Deep => self.deep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: CacheTtlConfig,
    /// Oldest-inserted entries are evicted beyond this count.
    pub max_entries: usize,
    /// Absolute age after which the cleanup pass drops an entry.
    pub max_age: Duration,
    /// Period of the background cleanup task.
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: CacheTtlConfig::default(),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CACHE_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl CacheConfig {
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn ttl(mut self, ttl: CacheTtlConfig) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}
