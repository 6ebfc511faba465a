//! Composite scoring and availability classification.
//!
//! Pure functions only: no I/O, no shared state. The composite is the weighted mean of the
//! sub-scores that were actually produced, with weights renormalized over that subset, so
//! a check that intentionally stops at Basic is never penalized for the tiers it skipped.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::CompositeScorer;
pub use types::{AvailabilityTier, ScoreVerdict, ScoreWeights, SubScores};
