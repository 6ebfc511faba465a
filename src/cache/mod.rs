//! Adaptive verdict cache.
//!
//! One entry per `(source_id, tier)`. Each entry lives for its tier's base TTL scaled by
//! how confident the verdict is: available results are kept longest, errors shortest.

pub mod adaptive;
pub mod clock;
pub mod config;
pub mod types;

#[cfg(test)]
mod tests;

pub use adaptive::AdaptiveCache;
#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use config::{CacheConfig, CacheTtlConfig};
pub use types::{CacheKey, CacheStats, CacheStatus};
