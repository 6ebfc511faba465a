use thiserror::Error;

use crate::check::CheckTier;

/// Faults in the scoring step. Any of these indicates an engine bug, not an
/// environmental condition.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("no sub-scores were produced")]
    NoSubScores,

    #[error("sub-score for {tier} is out of range: {value}")]
    InvalidSubScore { tier: CheckTier, value: f64 },

    #[error("invalid weight table: {reason}")]
    InvalidWeights { reason: String },
}
