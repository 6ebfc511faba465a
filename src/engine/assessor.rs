use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use super::error::EngineResult;
use super::types::{AssessOptions, StatsSnapshot};
use crate::cache::{AdaptiveCache, CacheStats, Clock, SystemClock};
use crate::check::{AssessmentResult, CheckTier, TieredChecker};
use crate::config::EngineConfig;
use crate::error::ErrorKind;
use crate::probe::{HttpProber, Prober};
use crate::reliability::{ReliabilityRecord, ReliabilityTracker};
use crate::scoring::CompositeScorer;
use crate::source::SourceDescriptor;

pub(super) struct EngineInner {
    pub(super) config: EngineConfig,
    pub(super) checker: TieredChecker,
    pub(super) scorer: CompositeScorer,
    pub(super) cache: Arc<AdaptiveCache>,
    pub(super) tracker: ReliabilityTracker,
    pub(super) clock: Arc<dyn Clock>,
}

/// Assessment engine. Owns its cache and reliability tracker; clones share them.
#[derive(Clone)]
pub struct Engine {
    pub(super) inner: Arc<EngineInner>,
}

impl Engine {
    /// Builds an engine that probes over real HTTP.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let prober = HttpProber::new(&config.prober_config())?;
        Ok(Self::with_prober(config, Arc::new(prober)))
    }

    pub fn from_env() -> EngineResult<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    pub fn with_prober(config: EngineConfig, prober: Arc<dyn Prober>) -> Self {
        Self::with_parts(config, prober, Arc::new(SystemClock))
    }

    /// Builds an engine from explicit collaborators. The clock drives cache expiry and
    /// verdict timestamps.
    pub fn with_parts(config: EngineConfig, prober: Arc<dyn Prober>, clock: Arc<dyn Clock>) -> Self {
        let cache = Arc::new(AdaptiveCache::with_clock(config.cache.clone(), clock.clone()));
        let checker = TieredChecker::new(prober, config.check_config());
        Self {
            inner: Arc::new(EngineInner {
                config,
                checker,
                scorer: CompositeScorer::new(),
                cache,
                tracker: ReliabilityTracker::new(),
                clock,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Assesses one source up to `tier`.
    ///
    /// Environmental failures never surface as errors: they come back as a verdict with
    /// an [`ErrorKind`] attached. Only an internal fault returns `Err`.
    #[instrument(skip(self, source, keyword, options), fields(source_id = %source.id, tier = %tier))]
    pub async fn assess(
        &self,
        source: &SourceDescriptor,
        tier: CheckTier,
        keyword: Option<&str>,
        options: AssessOptions,
    ) -> EngineResult<AssessmentResult> {
        let inner = &self.inner;

        if options.use_cache {
            if let Some(cached) = inner.cache.get(&source.id, tier) {
                debug!("Cache hit");
                return Ok(cached);
            }
            debug!("Cache miss");
        }

        let deadline = options.deadline(inner.config.timeout);
        let keyword_used = (tier >= CheckTier::Content).then(|| inner.checker.content_keyword(keyword));
        let start = Instant::now();

        let result = match timeout(deadline, inner.checker.run(source, tier, keyword, deadline)).await {
            Ok(report) => {
                let verdict = inner.scorer.score(&report.sub_scores)?;
                AssessmentResult::from_report(
                    &source.id,
                    tier,
                    keyword_used,
                    report,
                    verdict,
                    elapsed_ms(start),
                    inner.clock.now(),
                )
            }
            Err(_) => AssessmentResult::failing(
                &source.id,
                tier,
                ErrorKind::Timeout,
                format!("assessment exceeded {}ms", deadline.as_millis()),
                elapsed_ms(start),
                inner.clock.now(),
            ),
        };

        info!(
            composite = result.composite_score,
            availability = %result.availability_tier,
            available = result.available,
            response_time_ms = result.response_time_ms,
            error = ?result.error,
            "Assessment complete"
        );

        inner.cache.put(&source.id, tier, result.clone());
        inner.tracker.record_at(
            &source.id,
            result.available,
            result.response_time_ms,
            result.checked_at,
        );
        Ok(result)
    }

    /// Drops every cached tier for `source_id`.
    pub fn invalidate(&self, source_id: &str) -> usize {
        self.inner.cache.invalidate(source_id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    pub fn cache(&self) -> &Arc<AdaptiveCache> {
        &self.inner.cache
    }

    /// Starts the hourly cache cleanup pass; it stops once the engine is dropped.
    pub fn spawn_cache_cleanup(&self) -> JoinHandle<()> {
        self.inner.cache.spawn_cleanup_task()
    }

    pub fn reliability(&self, source_id: &str) -> Option<ReliabilityRecord> {
        self.inner.tracker.get(source_id)
    }

    pub fn reliability_tracker(&self) -> &ReliabilityTracker {
        &self.inner.tracker
    }

    /// Snapshot of reliability history and cache counters for an external store.
    pub fn export_stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            exported_at: self.inner.clock.now(),
            cache: self.inner.cache.stats(),
            reliability: self.inner.tracker.export(),
        }
    }

    /// Merges reliability history from a previous session. Cache counters are not restored.
    pub fn import_stats(&self, snapshot: StatsSnapshot) -> usize {
        self.inner.tracker.import(snapshot.reliability)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.inner.config)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

pub(super) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
