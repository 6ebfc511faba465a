//! Verdict cache with status-scaled TTLs.
//!
//! Expired entries are evicted lazily on lookup. Past `max_entries` the oldest inserted
//! entry goes first, whatever its TTL or how often it was read.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::config::CacheConfig;
use super::types::{CacheEntry, CacheKey, CacheStats, CacheStatus};
use crate::check::{AssessmentResult, CheckTier};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Insertion sequence → key, oldest first.
    order: BTreeMap<u64, CacheKey>,
    next_seq: u64,
}

impl CacheState {
    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn retain(&mut self, mut keep: impl FnMut(&CacheKey, &CacheEntry) -> bool) -> usize {
        let doomed: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, entry)| !keep(key, entry))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            self.remove(key);
        }
        doomed.len()
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

/// Last verdict per `(source_id, tier)`.
pub struct AdaptiveCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
    counters: Counters,
}

impl AdaptiveCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(CacheState::default()),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Effective TTL for a verdict: the tier's base TTL scaled by its status factor.
    pub fn ttl_for(&self, tier: CheckTier, status: CacheStatus) -> Duration {
        self.config.ttl.base(tier).mul_f64(status.ttl_factor())
    }

    /// Returns the cached verdict, evicting it first if it has expired.
    pub fn get(&self, source_id: &str, tier: CheckTier) -> Option<AssessmentResult> {
        let key = CacheKey::new(source_id, tier);
        let now = self.clock.now();
        let mut state = self.state.lock();

        let expired = match state.entries.get(&key) {
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => now >= entry.expires_at,
        };

        if expired {
            state.remove(&key);
            self.counters.expirations.fetch_add(1, Ordering::Relaxed);
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            debug!(source_id, tier = %tier, "Cache entry expired");
            return None;
        }

        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        state.entries.get(&key).map(|entry| entry.result.clone())
    }

    /// Stores a verdict, replacing any previous one for the same key.
    pub fn put(&self, source_id: &str, tier: CheckTier, result: AssessmentResult) {
        let key = CacheKey::new(source_id, tier);
        let status = CacheStatus::of(&result);
        let ttl = self.ttl_for(tier, status);
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut state = self.state.lock();
        state.remove(&key);

        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.insert(seq, key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: now,
                expires_at,
                seq,
            },
        );
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);

        while state.entries.len() > self.config.max_entries {
            let Some((_, oldest)) = state.order.pop_first() else {
                break;
            };
            state.entries.remove(&oldest);
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(source_id = %oldest.source_id, tier = %oldest.tier, "Evicted oldest cache entry");
        }

        debug!(source_id, tier = %tier, ?status, ttl_secs = ttl.as_secs(), "Cached verdict");
    }

    /// Drops every tier cached for `source_id`. Returns how many entries went.
    pub fn invalidate(&self, source_id: &str) -> usize {
        self.state
            .lock()
            .retain(|key, _| key.source_id != source_id)
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes entries that are expired or older than `max_age` at `now`.
    pub fn cleanup(&self, now: DateTime<Utc>) -> usize {
        let max_age = TimeDelta::from_std(self.config.max_age).unwrap_or(TimeDelta::MAX);
        let removed = self.state.lock().retain(|_, entry| {
            now < entry.expires_at && now.signed_duration_since(entry.inserted_at) < max_age
        });
        if removed > 0 {
            self.counters
                .expirations
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "Cache cleanup pass");
        }
        removed
    }

    /// Runs [`cleanup`](Self::cleanup) every `cleanup_interval` until the cache is dropped.
    pub fn spawn_cleanup_task(self: &Arc<Self>) -> JoinHandle<()> {
        let period = self.config.cleanup_interval.max(Duration::from_millis(1));
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                cache.cleanup(cache.clock.now());
            }
        })
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for AdaptiveCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for AdaptiveCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
