use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::check::{AssessmentResult, CheckTier};
use crate::constants::{
    TTL_FACTOR_AVAILABLE, TTL_FACTOR_ERROR, TTL_FACTOR_TIMEOUT, TTL_FACTOR_UNAVAILABLE,
};
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_id: String,
    pub tier: CheckTier,
}

impl CacheKey {
    pub fn new(source_id: impl Into<String>, tier: CheckTier) -> Self {
        Self {
            source_id: source_id.into(),
            tier,
        }
    }
}

/// Verdict status that scales an entry's TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Available,
    Unavailable,
    Timeout,
    Error,
}

impl CacheStatus {
    pub fn of(result: &AssessmentResult) -> Self {
        if result.available {
            return CacheStatus::Available;
        }
        match result.error {
            Some(ErrorKind::Timeout) => CacheStatus::Timeout,
            Some(ErrorKind::Transport | ErrorKind::Internal) => CacheStatus::Error,
            _ => CacheStatus::Unavailable,
        }
    }

    #[inline]
    pub fn ttl_factor(&self) -> f64 {
        match self {
            CacheStatus::Available => TTL_FACTOR_AVAILABLE,
            CacheStatus::Unavailable => TTL_FACTOR_UNAVAILABLE,
            CacheStatus::Timeout => TTL_FACTOR_TIMEOUT,
            CacheStatus::Error => TTL_FACTOR_ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub result: AssessmentResult,
    pub inserted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Insertion sequence number, used for oldest-first eviction.
    pub seq: u64,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
