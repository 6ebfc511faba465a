//! Cross-cutting, shared constants.
//!
//! Weights, thresholds and keyword pools live here so the scorer, the analyzer and the
//! orchestrator cannot drift apart.

/// Composite weight of the Basic tier sub-score.
pub const WEIGHT_BASIC: f64 = 0.2;
/// Composite weight of the Functional tier sub-score.
pub const WEIGHT_FUNCTIONAL: f64 = 0.3;
/// Composite weight of the Content tier sub-score.
pub const WEIGHT_CONTENT: f64 = 0.4;
/// Composite weight of the Deep tier sub-score.
pub const WEIGHT_DEEP: f64 = 0.1;

pub const THRESHOLD_EXCELLENT: f64 = 0.90;
pub const THRESHOLD_GOOD: f64 = 0.75;
pub const THRESHOLD_MODERATE: f64 = 0.50;
pub const THRESHOLD_POOR: f64 = 0.25;

/// A composite score strictly above this is reported as `available`.
pub const AVAILABLE_THRESHOLD: f64 = 0.25;

/// A Basic sub-score strictly above this counts as connectivity.
pub const BASIC_CONNECTIVITY_THRESHOLD: f64 = 0.3;

/// A match score strictly above this counts as target content.
pub const TARGET_CONTENT_THRESHOLD: f64 = 0.3;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const MIN_TIMEOUT_MS: u64 = 1_000;
pub const MAX_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_CONCURRENCY: usize = 3;
pub const DEFAULT_BATCH_PACING_MS: u64 = 250;

pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
/// Functional probes only need to see the response start.
pub const FUNCTIONAL_MAX_BODY_BYTES: usize = 8 * 1024;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("vigil-probe/", env!("CARGO_PKG_VERSION"));

/// Static paths probed by the Basic tier besides the origin itself.
pub const BASIC_RESOLUTION_PATH: &str = "/favicon.ico";
pub const BASIC_STATIC_PATH: &str = "/robots.txt";

/// Generic keywords tried in turn by the Functional tier.
pub const FALLBACK_KEYWORDS: [&str; 3] = ["test", "video", "2024"];
/// Maximum number of fallback keywords attempted by the Functional tier.
pub const MAX_FUNCTIONAL_ATTEMPTS: usize = 3;

/// Keyword used by the Content tier when the caller supplies none.
pub const DEFAULT_CONTENT_KEYWORD: &str = "SSIS-001";

/// Distinct pools the Deep tier draws its extra keywords from.
pub const DEEP_CODE_POOL: [&str; 3] = ["SSIS-001", "IPX-001", "MIDV-001"];
pub const DEEP_GENERIC_POOL: [&str; 3] = ["sample", "new", "popular"];

/// Maximum entries kept in each source's recent-outcome ring buffer.
pub const RECENT_OUTCOMES_CAPACITY: usize = 10;

/// Placeholder substituted in source URL templates.
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

/// Base cache TTLs per tier, before the status factor is applied.
pub const CACHE_TTL_BASIC_SECS: u64 = 5 * 60;
pub const CACHE_TTL_FUNCTIONAL_SECS: u64 = 10 * 60;
pub const CACHE_TTL_CONTENT_SECS: u64 = 15 * 60;
pub const CACHE_TTL_DEEP_SECS: u64 = 30 * 60;

/// TTL multipliers by verdict status.
pub const TTL_FACTOR_AVAILABLE: f64 = 1.0;
pub const TTL_FACTOR_UNAVAILABLE: f64 = 0.5;
pub const TTL_FACTOR_TIMEOUT: f64 = 0.3;
pub const TTL_FACTOR_ERROR: f64 = 0.2;

pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
/// Entries older than this are dropped by the cleanup pass regardless of TTL.
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_CACHE_CLEANUP_INTERVAL_SECS: u64 = 60 * 60;
