use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::check::CheckTier;
use crate::config::clamp_timeout_ms;
use crate::reliability::ReliabilitySnapshot;

/// Per-call options of [`Engine::assess`](super::Engine::assess).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessOptions {
    /// Overall deadline; `None` uses the engine default. Clamped to 1s..=30s.
    pub timeout_ms: Option<u64>,
    /// Serve a fresh cached verdict instead of probing.
    pub use_cache: bool,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            use_cache: true,
        }
    }
}

impl AssessOptions {
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub(crate) fn deadline(&self, default: Duration) -> Duration {
        let requested = self
            .timeout_ms
            .unwrap_or_else(|| u64::try_from(default.as_millis()).unwrap_or(u64::MAX));
        Duration::from_millis(clamp_timeout_ms(requested))
    }
}

/// Options of [`Engine::assess_batch`](super::Engine::assess_batch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub tier: CheckTier,
    pub keyword: Option<String>,
    pub timeout_ms: Option<u64>,
    pub use_cache: bool,
    /// Sources checked at once; `None` uses the engine default, `0` counts as 1.
    pub concurrency: Option<usize>,
    /// Pause between batches; `None` uses the engine default.
    pub pacing: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            tier: CheckTier::default(),
            keyword: None,
            timeout_ms: None,
            use_cache: true,
            concurrency: None,
            pacing: None,
        }
    }
}

impl BatchOptions {
    pub fn tier(mut self, tier: CheckTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub(crate) fn assess_options(&self) -> AssessOptions {
        AssessOptions {
            timeout_ms: self.timeout_ms,
            use_cache: self.use_cache,
        }
    }
}

/// Cross-session snapshot of the engine's bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub exported_at: DateTime<Utc>,
    pub cache: CacheStats,
    pub reliability: ReliabilitySnapshot,
}
