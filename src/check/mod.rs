//! Tiered check orchestration.
//!
//! Tiers run strictly in order, Basic → Functional → Content → Deep, and stop as soon as
//! the requested tier's sub-score exists. A Basic tier without connectivity stops the
//! escalation. Failures inside a tier are recorded as outcomes and never abort the
//! remaining attempts of that tier.

pub mod config;
pub mod orchestrator;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::CheckConfig;
pub use orchestrator::TieredChecker;
pub use types::{AssessmentResult, CheckReport, CheckTier, DeepMetrics};
