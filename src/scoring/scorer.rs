use tracing::debug;

use super::error::ScoringError;
use super::types::{AvailabilityTier, ScoreVerdict, ScoreWeights, SubScores};
use crate::constants::AVAILABLE_THRESHOLD;

/// Combines tier sub-scores into a composite and classifies it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeScorer {
    weights: ScoreWeights,
}

impl CompositeScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Result<Self, ScoringError> {
        let all = [
            weights.basic,
            weights.functional,
            weights.content,
            weights.deep,
        ];
        if all.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ScoringError::InvalidWeights {
                reason: format!("every weight must be finite and > 0, got {weights:?}"),
            });
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Weighted mean over the produced sub-scores only.
    pub fn composite(&self, scores: &SubScores) -> Result<f64, ScoringError> {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for (tier, score) in scores.iter() {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(ScoringError::InvalidSubScore { tier, value: score });
            }
            let weight = self.weights.weight(tier);
            weighted += weight * score;
            total_weight += weight;
        }

        if scores.is_empty() {
            return Err(ScoringError::NoSubScores);
        }
        if total_weight <= 0.0 {
            return Err(ScoringError::InvalidWeights {
                reason: format!("executed tiers carry zero total weight ({total_weight})"),
            });
        }

        Ok((weighted / total_weight).clamp(0.0, 1.0))
    }

    pub fn classify(&self, composite: f64) -> AvailabilityTier {
        AvailabilityTier::from_score(composite)
    }

    pub fn is_available(&self, composite: f64) -> bool {
        composite > AVAILABLE_THRESHOLD
    }

    pub fn score(&self, scores: &SubScores) -> Result<ScoreVerdict, ScoringError> {
        let composite = self.composite(scores)?;
        let verdict = ScoreVerdict {
            composite,
            tier: self.classify(composite),
            available: self.is_available(composite),
        };
        debug!(
            composite = verdict.composite,
            tier = %verdict.tier,
            available = verdict.available,
            "Scored sub-scores"
        );
        Ok(verdict)
    }
}
