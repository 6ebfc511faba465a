//! Vigil: tiered availability and relevance assessment for templated search endpoints.
//!
//! A source is an external endpoint described by a URL template with a `{keyword}`
//! placeholder. The [`Engine`] answers, for one source or many, how reachable it is, whether
//! its search works and whether what it returns is relevant to a keyword.
//!
//! # Public API Surface
//!
//! ## Entry points
//! - [`Engine::assess`], [`Engine::assess_batch`] - single and batched assessments
//! - [`AssessOptions`], [`BatchOptions`] - per-call options
//! - [`Engine::export_stats`], [`Engine::import_stats`] - cross-session bookkeeping
//!
//! ## Building blocks
//! - [`HttpProber`] and the [`Prober`] trait - bounded HEAD/GET probes
//! - [`ContentAnalyzer`] - relevance of a fetched HTML page
//! - [`TieredChecker`] - Basic → Functional → Content → Deep escalation
//! - [`CompositeScorer`] - weighted composite and availability tier
//! - [`AdaptiveCache`] - verdict cache with status-scaled TTLs
//! - [`ReliabilityTracker`] - rolling per-source history
//!
//! ## Configuration
//! [`EngineConfig::from_env`] reads `VIGIL_*` overrides on top of defaults.
//!
//! ## Test/Mock Support
//! [`MockProber`] and [`ManualClock`] are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod cache;
pub mod check;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod probe;
pub mod reliability;
pub mod scoring;
pub mod source;

pub use analysis::{ContentAnalyzer, ContentQuality, PageSignals, RelevanceResult};
#[cfg(any(test, feature = "mock"))]
pub use cache::ManualClock;
pub use cache::{AdaptiveCache, CacheConfig, CacheStats, CacheStatus, CacheTtlConfig, Clock, SystemClock};
pub use check::{AssessmentResult, CheckConfig, CheckTier, TieredChecker};
pub use config::{ConfigError, EngineConfig};
pub use engine::{AssessOptions, BatchOptions, Engine, EngineError, EngineResult, StatsSnapshot};
pub use error::ErrorKind;
#[cfg(any(test, feature = "mock"))]
pub use probe::{MockProber, MockResponse};
pub use probe::{HttpProber, ProbeOutcome, ProbeRequest, Prober, ProberConfig};
pub use reliability::{ReliabilityRecord, ReliabilitySnapshot, ReliabilityTracker, Trend};
pub use scoring::{AvailabilityTier, CompositeScorer, ScoreVerdict, ScoringError, SubScores};
pub use source::{SourceDescriptor, SourceError};
