use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::RECENT_OUTCOMES_CAPACITY;

/// Minimum recent samples before a trend is reported.
const MIN_TREND_SAMPLES: usize = 4;
/// Success-rate change between window halves that counts as a trend.
const TREND_DELTA: f64 = 0.2;

/// One completed assessment as seen by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSample {
    pub timestamp: DateTime<Utc>,
    pub available: bool,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Degrading,
    /// Too few recent samples to tell.
    Unknown,
}

/// History for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityRecord {
    pub source_id: String,
    pub total_checks: u64,
    pub successful_checks: u64,
    /// Most recent outcomes, oldest first, at most [`RECENT_OUTCOMES_CAPACITY`].
    pub recent_outcomes: VecDeque<OutcomeSample>,
    pub total_response_ms: u64,
    pub min_response_ms: Option<u64>,
    pub max_response_ms: Option<u64>,
    pub last_checked: Option<DateTime<Utc>>,
}

impl ReliabilityRecord {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            total_checks: 0,
            successful_checks: 0,
            recent_outcomes: VecDeque::with_capacity(RECENT_OUTCOMES_CAPACITY),
            total_response_ms: 0,
            min_response_ms: None,
            max_response_ms: None,
            last_checked: None,
        }
    }

    pub(crate) fn push(&mut self, sample: OutcomeSample) {
        self.total_checks += 1;
        if sample.available {
            self.successful_checks += 1;
        }
        self.total_response_ms = self.total_response_ms.saturating_add(sample.response_time_ms);
        self.min_response_ms = Some(
            self.min_response_ms
                .map_or(sample.response_time_ms, |m| m.min(sample.response_time_ms)),
        );
        self.max_response_ms = Some(
            self.max_response_ms
                .map_or(sample.response_time_ms, |m| m.max(sample.response_time_ms)),
        );
        self.last_checked = Some(
            self.last_checked
                .map_or(sample.timestamp, |t| t.max(sample.timestamp)),
        );

        self.recent_outcomes.push_back(sample);
        self.trim_recent();
    }

    /// Folds `other`'s history into this record.
    pub(crate) fn merge(&mut self, other: ReliabilityRecord) {
        self.total_checks += other.total_checks;
        self.successful_checks += other.successful_checks;
        self.total_response_ms = self.total_response_ms.saturating_add(other.total_response_ms);
        self.min_response_ms = match (self.min_response_ms, other.min_response_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_response_ms = self.max_response_ms.max(other.max_response_ms);
        self.last_checked = self.last_checked.max(other.last_checked);

        self.recent_outcomes.extend(other.recent_outcomes);
        self.recent_outcomes
            .make_contiguous()
            .sort_by_key(|s| s.timestamp);
        self.trim_recent();
    }

    pub(crate) fn trim_recent(&mut self) {
        while self.recent_outcomes.len() > RECENT_OUTCOMES_CAPACITY {
            self.recent_outcomes.pop_front();
        }
    }

    /// All-time fraction of available verdicts.
    pub fn success_rate(&self) -> f64 {
        ratio(self.successful_checks, self.total_checks)
    }

    /// Fraction of available verdicts in the recent window.
    pub fn recent_success_rate(&self) -> f64 {
        let ok = self.recent_outcomes.iter().filter(|s| s.available).count();
        ratio(ok as u64, self.recent_outcomes.len() as u64)
    }

    pub fn average_response_ms(&self) -> f64 {
        ratio(self.total_response_ms, self.total_checks)
    }

    pub fn recent_average_response_ms(&self) -> f64 {
        let total: u64 = self
            .recent_outcomes
            .iter()
            .map(|s| s.response_time_ms)
            .sum();
        ratio(total, self.recent_outcomes.len() as u64)
    }

    /// Compares success rates of the older and newer halves of the recent window.
    pub fn trend(&self) -> Trend {
        let n = self.recent_outcomes.len();
        if n < MIN_TREND_SAMPLES {
            return Trend::Unknown;
        }
        let half = n / 2;
        let older = window_rate(self.recent_outcomes.iter().take(half));
        let newer = window_rate(self.recent_outcomes.iter().skip(n - half));

        let delta = newer - older;
        if delta > TREND_DELTA {
            Trend::Improving
        } else if delta < -TREND_DELTA {
            Trend::Degrading
        } else {
            Trend::Stable
        }
    }
}

fn window_rate<'a>(samples: impl Iterator<Item = &'a OutcomeSample>) -> f64 {
    let (ok, total) = samples.fold((0u64, 0u64), |(ok, total), s| {
        (ok + u64::from(s.available), total + 1)
    });
    ratio(ok, total)
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Serializable copy of every tracked record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReliabilitySnapshot {
    pub records: Vec<ReliabilityRecord>,
}
