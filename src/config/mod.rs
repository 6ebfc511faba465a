//! Environment-backed engine configuration.
//!
//! Every setting has a default. Override with `VIGIL_*` environment variables; per-call
//! [`AssessOptions`](crate::engine::AssessOptions) still take precedence for a single check.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::cache::{CacheConfig, CacheTtlConfig};
use crate::check::CheckConfig;
use crate::constants::{
    DEFAULT_BATCH_PACING_MS, DEFAULT_CONCURRENCY, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_REDIRECTS,
    DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS,
};
use crate::probe::ProberConfig;

/// Engine configuration loaded from environment variables.
///
/// Use [`EngineConfig::from_env`] to read `VIGIL_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Overall deadline of one assessment when the caller gives none. Default: 10s.
    pub timeout: Duration,

    /// Sources checked concurrently per batch. Default: `3`.
    pub concurrency: usize,

    /// Pause between consecutive batches. Default: 250ms.
    pub batch_pacing: Duration,

    /// TTLs, capacity and cleanup cadence of the verdict cache.
    pub cache: CacheConfig,

    /// Body prefix read for Content and Deep pages. Default: 256 KiB.
    pub max_body_bytes: usize,

    /// Redirects followed per probe. Default: `5`.
    pub max_redirects: usize,

    /// `User-Agent` sent with every probe.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            concurrency: DEFAULT_CONCURRENCY,
            batch_pacing: Duration::from_millis(DEFAULT_BATCH_PACING_MS),
            cache: CacheConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl EngineConfig {
    const ENV_TIMEOUT_MS: &'static str = "VIGIL_TIMEOUT_MS";
    const ENV_CONCURRENCY: &'static str = "VIGIL_CONCURRENCY";
    const ENV_BATCH_PACING_MS: &'static str = "VIGIL_BATCH_PACING_MS";
    const ENV_CACHE_MAX_ENTRIES: &'static str = "VIGIL_CACHE_MAX_ENTRIES";
    const ENV_CACHE_TTL_BASIC_SECS: &'static str = "VIGIL_CACHE_TTL_BASIC_SECS";
    const ENV_CACHE_TTL_FUNCTIONAL_SECS: &'static str = "VIGIL_CACHE_TTL_FUNCTIONAL_SECS";
    const ENV_CACHE_TTL_CONTENT_SECS: &'static str = "VIGIL_CACHE_TTL_CONTENT_SECS";
    const ENV_CACHE_TTL_DEEP_SECS: &'static str = "VIGIL_CACHE_TTL_DEEP_SECS";
    const ENV_CACHE_MAX_AGE_SECS: &'static str = "VIGIL_CACHE_MAX_AGE_SECS";
    const ENV_CACHE_CLEANUP_INTERVAL_SECS: &'static str = "VIGIL_CACHE_CLEANUP_INTERVAL_SECS";
    const ENV_MAX_BODY_BYTES: &'static str = "VIGIL_MAX_BODY_BYTES";
    const ENV_MAX_REDIRECTS: &'static str = "VIGIL_MAX_REDIRECTS";
    const ENV_USER_AGENT: &'static str = "VIGIL_USER_AGENT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ttl_defaults = defaults.cache.ttl;

        let timeout_ms = Self::parse_u64_from_env(Self::ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?;
        let ttl = CacheTtlConfig {
            basic: Self::parse_secs_from_env(Self::ENV_CACHE_TTL_BASIC_SECS, ttl_defaults.basic)?,
            functional: Self::parse_secs_from_env(
                Self::ENV_CACHE_TTL_FUNCTIONAL_SECS,
                ttl_defaults.functional,
            )?,
            content: Self::parse_secs_from_env(
                Self::ENV_CACHE_TTL_CONTENT_SECS,
                ttl_defaults.content,
            )?,
            deep: Self::parse_secs_from_env(Self::ENV_CACHE_TTL_DEEP_SECS, ttl_defaults.deep)?,
        };
        let cache = CacheConfig {
            ttl,
            max_entries: Self::parse_usize_from_env(
                Self::ENV_CACHE_MAX_ENTRIES,
                defaults.cache.max_entries,
            )?,
            max_age: Self::parse_secs_from_env(
                Self::ENV_CACHE_MAX_AGE_SECS,
                defaults.cache.max_age,
            )?,
            cleanup_interval: Self::parse_secs_from_env(
                Self::ENV_CACHE_CLEANUP_INTERVAL_SECS,
                defaults.cache.cleanup_interval,
            )?,
        };

        let config = Self {
            timeout: Duration::from_millis(clamp_timeout_ms(timeout_ms)),
            concurrency: Self::parse_usize_from_env(Self::ENV_CONCURRENCY, defaults.concurrency)?,
            batch_pacing: Duration::from_millis(Self::parse_u64_from_env(
                Self::ENV_BATCH_PACING_MS,
                DEFAULT_BATCH_PACING_MS,
            )?),
            cache,
            max_body_bytes: Self::parse_usize_from_env(
                Self::ENV_MAX_BODY_BYTES,
                defaults.max_body_bytes,
            )?,
            max_redirects: Self::parse_usize_from_env(
                Self::ENV_MAX_REDIRECTS,
                defaults.max_redirects,
            )?,
            user_agent: Self::parse_string_from_env(Self::ENV_USER_AGENT, defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that parsing alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_MAX_ENTRIES,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.cache.cleanup_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_CLEANUP_INTERVAL_SECS,
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_BODY_BYTES,
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_USER_AGENT,
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn prober_config(&self) -> ProberConfig {
        ProberConfig {
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
        }
    }

    pub fn check_config(&self) -> CheckConfig {
        CheckConfig::default().max_body_bytes(self.max_body_bytes)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.trim().parse().map_err(|e| ConfigError::ParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.trim().parse().map_err(|e| ConfigError::ParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        Self::parse_u64_from_env(var_name, default.as_secs()).map(Duration::from_secs)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}

/// Clamps a per-check deadline into the supported range.
pub fn clamp_timeout_ms(timeout_ms: u64) -> u64 {
    timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
}
