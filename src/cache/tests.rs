use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use super::*;
use crate::check::{AssessmentResult, CheckTier};
use crate::error::ErrorKind;
use crate::scoring::AvailabilityTier;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    ))
}

fn cache_with(config: CacheConfig, clock: &Arc<ManualClock>) -> AdaptiveCache {
    AdaptiveCache::with_clock(config, clock.clone())
}

fn verdict(source_id: &str, available: bool, error: Option<ErrorKind>) -> AssessmentResult {
    let mut result = AssessmentResult::failing(
        source_id,
        CheckTier::Basic,
        ErrorKind::Http,
        "fixture",
        12,
        Utc::now(),
    );
    result.error = error;
    if available {
        result.composite_score = 1.0;
        result.availability_tier = AvailabilityTier::Excellent;
        result.available = true;
    }
    result
}

#[test]
fn test_put_then_get_returns_identical_result() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default(), &clock);
    let result = verdict("a", true, None);

    cache.put("a", CheckTier::Basic, result.clone());
    assert_eq!(cache.get("a", CheckTier::Basic), Some(result));
    assert_eq!(cache.get("a", CheckTier::Functional), None);
    assert_eq!(cache.get("b", CheckTier::Basic), None);
}

#[test]
fn test_entry_expires_after_base_ttl() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default(), &clock);
    cache.put("a", CheckTier::Basic, verdict("a", true, None));

    clock.advance(Duration::from_secs(299));
    assert!(cache.get("a", CheckTier::Basic).is_some());

    clock.advance(Duration::from_secs(1));
    assert!(cache.get("a", CheckTier::Basic).is_none());
    assert!(cache.is_empty());
    assert_eq!(cache.stats().expirations, 1);
}

#[test]
fn test_ttl_is_scaled_by_status() {
    let cache = AdaptiveCache::default();
    let tier = CheckTier::Functional;
    assert_eq!(
        cache.ttl_for(tier, CacheStatus::Available),
        Duration::from_secs(600)
    );
    assert_eq!(
        cache.ttl_for(tier, CacheStatus::Unavailable),
        Duration::from_secs(300)
    );
    assert_eq!(
        cache.ttl_for(tier, CacheStatus::Timeout),
        Duration::from_secs(180)
    );
    assert_eq!(
        cache.ttl_for(tier, CacheStatus::Error),
        Duration::from_secs(120)
    );
    assert_eq!(
        cache.ttl_for(CheckTier::Deep, CacheStatus::Available),
        Duration::from_secs(1800)
    );
}

#[test]
fn test_failed_verdict_is_revalidated_sooner() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default(), &clock);
    cache.put("up", CheckTier::Content, verdict("up", true, None));
    cache.put(
        "down",
        CheckTier::Content,
        verdict("down", false, Some(ErrorKind::Transport)),
    );

    // Content base is 900s; errors keep 20% of it.
    clock.advance(Duration::from_secs(180));
    assert!(cache.get("down", CheckTier::Content).is_none());
    assert!(cache.get("up", CheckTier::Content).is_some());
}

#[test]
fn test_cache_status_derivation() {
    assert_eq!(
        CacheStatus::of(&verdict("a", true, Some(ErrorKind::Timeout))),
        CacheStatus::Available
    );
    assert_eq!(
        CacheStatus::of(&verdict("a", false, Some(ErrorKind::Timeout))),
        CacheStatus::Timeout
    );
    assert_eq!(
        CacheStatus::of(&verdict("a", false, Some(ErrorKind::Transport))),
        CacheStatus::Error
    );
    assert_eq!(
        CacheStatus::of(&verdict("a", false, Some(ErrorKind::Internal))),
        CacheStatus::Error
    );
    assert_eq!(
        CacheStatus::of(&verdict("a", false, Some(ErrorKind::Http))),
        CacheStatus::Unavailable
    );
    assert_eq!(
        CacheStatus::of(&verdict("a", false, None)),
        CacheStatus::Unavailable
    );
}

#[test]
fn test_capacity_evicts_oldest_inserted_not_least_recently_used() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default().max_entries(2), &clock);
    cache.put("a", CheckTier::Basic, verdict("a", true, None));
    cache.put("b", CheckTier::Basic, verdict("b", true, None));

    // Reading "a" does not protect it.
    assert!(cache.get("a", CheckTier::Basic).is_some());
    cache.put("c", CheckTier::Basic, verdict("c", true, None));

    assert_eq!(cache.len(), 2);
    assert!(cache.get("a", CheckTier::Basic).is_none());
    assert!(cache.get("b", CheckTier::Basic).is_some());
    assert!(cache.get("c", CheckTier::Basic).is_some());
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_reinsert_moves_entry_to_newest() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default().max_entries(2), &clock);
    cache.put("a", CheckTier::Basic, verdict("a", true, None));
    cache.put("b", CheckTier::Basic, verdict("b", true, None));
    cache.put("a", CheckTier::Basic, verdict("a", false, None));
    cache.put("c", CheckTier::Basic, verdict("c", true, None));

    assert!(cache.get("b", CheckTier::Basic).is_none());
    let a = cache.get("a", CheckTier::Basic).unwrap();
    assert!(!a.available);
}

#[test]
fn test_invalidate_drops_every_tier_of_a_source() {
    let cache = AdaptiveCache::default();
    for tier in CheckTier::ALL {
        cache.put("a", tier, verdict("a", true, None));
    }
    cache.put("b", CheckTier::Basic, verdict("b", true, None));

    assert_eq!(cache.invalidate("a"), 4);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.invalidate("a"), 0);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cleanup_drops_entries_past_max_age() {
    let clock = clock();
    let long_ttl = CacheTtlConfig {
        basic: Duration::from_secs(7 * 24 * 3600),
        ..CacheTtlConfig::default()
    };
    let cache = cache_with(CacheConfig::default().ttl(long_ttl), &clock);
    cache.put("old", CheckTier::Basic, verdict("old", true, None));

    clock.advance(Duration::from_secs(23 * 3600));
    cache.put("fresh", CheckTier::Basic, verdict("fresh", true, None));
    assert_eq!(cache.cleanup(clock.now()), 0);

    clock.advance(Duration::from_secs(3600));
    assert_eq!(cache.cleanup(clock.now()), 1);
    assert!(cache.get("old", CheckTier::Basic).is_none());
    assert!(cache.get("fresh", CheckTier::Basic).is_some());
}

#[test]
fn test_cleanup_also_drops_expired_entries() {
    let clock = clock();
    let cache = cache_with(CacheConfig::default(), &clock);
    cache.put("a", CheckTier::Basic, verdict("a", true, None));
    cache.put("b", CheckTier::Deep, verdict("b", true, None));

    clock.advance(Duration::from_secs(600));
    assert_eq!(cache.cleanup(clock.now()), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_stats_track_hits_and_misses() {
    let cache = AdaptiveCache::default();
    cache.get("a", CheckTier::Basic);
    cache.put("a", CheckTier::Basic, verdict("a", true, None));
    cache.get("a", CheckTier::Basic);
    cache.get("a", CheckTier::Basic);

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.inserts, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(CacheStats::default().hit_rate(), 0.0);
}

#[tokio::test]
async fn test_cleanup_task_runs_periodically() {
    let clock = clock();
    let config = CacheConfig {
        cleanup_interval: Duration::from_millis(20),
        ..CacheConfig::default()
    };
    let cache = Arc::new(cache_with(config, &clock));
    cache.put("a", CheckTier::Basic, verdict("a", true, None));
    let handle = cache.spawn_cleanup_task();

    clock.advance(Duration::from_secs(25 * 3600));
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(cache.is_empty());

    drop(cache);
    let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(finished.is_ok(), "cleanup task should stop once the cache is gone");
}
