use serde::{Deserialize, Serialize};

use crate::check::CheckTier;
use crate::constants::{
    THRESHOLD_EXCELLENT, THRESHOLD_GOOD, THRESHOLD_MODERATE, THRESHOLD_POOR, WEIGHT_BASIC,
    WEIGHT_CONTENT, WEIGHT_DEEP, WEIGHT_FUNCTIONAL,
};

/// Sub-scores of the tiers that ran; `None` means the tier was skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<f64>,
}

impl SubScores {
    pub fn basic_only(score: f64) -> Self {
        Self {
            basic: Some(score),
            ..Self::default()
        }
    }

    pub fn get(&self, tier: CheckTier) -> Option<f64> {
        match tier {
            CheckTier::Basic => self.basic,
            CheckTier::Functional => self.functional,
            CheckTier::Content => self.content,
            CheckTier::Deep => self.deep,
        }
    }

    pub fn set(&mut self, tier: CheckTier, score: f64) {
        let slot = match tier {
            CheckTier::Basic => &mut self.basic,
            CheckTier::Functional => &mut self.functional,
            CheckTier::Content => &mut self.content,
            CheckTier::Deep => &mut self.deep,
        };
        *slot = Some(score);
    }

    /// Iterates `(tier, score)` over produced sub-scores in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckTier, f64)> + '_ {
        CheckTier::ALL
            .into_iter()
            .filter_map(|tier| self.get(tier).map(|score| (tier, score)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Highest tier that produced a sub-score.
    pub fn highest(&self) -> Option<CheckTier> {
        self.iter().last().map(|(tier, _)| tier)
    }
}

/// Fixed per-tier weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub basic: f64,
    pub functional: f64,
    pub content: f64,
    pub deep: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            basic: WEIGHT_BASIC,
            functional: WEIGHT_FUNCTIONAL,
            content: WEIGHT_CONTENT,
            deep: WEIGHT_DEEP,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, tier: CheckTier) -> f64 {
        match tier {
            CheckTier::Basic => self.basic,
            CheckTier::Functional => self.functional,
            CheckTier::Content => self.content,
            CheckTier::Deep => self.deep,
        }
    }
}

/// Discrete availability classification of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityTier {
    Failing,
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl AvailabilityTier {
    /// Maps a composite score by descending threshold.
    pub fn from_score(score: f64) -> Self {
        if score >= THRESHOLD_EXCELLENT {
            AvailabilityTier::Excellent
        } else if score >= THRESHOLD_GOOD {
            AvailabilityTier::Good
        } else if score >= THRESHOLD_MODERATE {
            AvailabilityTier::Moderate
        } else if score >= THRESHOLD_POOR {
            AvailabilityTier::Poor
        } else {
            AvailabilityTier::Failing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityTier::Excellent => "excellent",
            AvailabilityTier::Good => "good",
            AvailabilityTier::Moderate => "moderate",
            AvailabilityTier::Poor => "poor",
            AvailabilityTier::Failing => "failing",
        }
    }
}

impl std::fmt::Display for AvailabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score with its derived classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVerdict {
    pub composite: f64,
    pub tier: AvailabilityTier,
    pub available: bool,
}

impl ScoreVerdict {
    /// The verdict for a check that produced nothing usable.
    pub fn failing() -> Self {
        Self {
            composite: 0.0,
            tier: AvailabilityTier::Failing,
            available: false,
        }
    }
}
