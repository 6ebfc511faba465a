use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorKind;
use crate::scoring::{AvailabilityTier, ScoreVerdict, SubScores};

/// Escalating check depth. Ordered: `Basic < Functional < Content < Deep`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckTier {
    Basic,
    #[default]
    Functional,
    Content,
    Deep,
}

impl CheckTier {
    pub const ALL: [CheckTier; 4] = [
        CheckTier::Basic,
        CheckTier::Functional,
        CheckTier::Content,
        CheckTier::Deep,
    ];

    /// Zero-based position in the escalation order.
    pub fn index(&self) -> usize {
        match self {
            CheckTier::Basic => 0,
            CheckTier::Functional => 1,
            CheckTier::Content => 2,
            CheckTier::Deep => 3,
        }
    }

    /// Number of tiers that run when this tier is requested.
    pub fn depth(&self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckTier::Basic => "basic",
            CheckTier::Functional => "functional",
            CheckTier::Content => "content",
            CheckTier::Deep => "deep",
        }
    }
}

impl std::fmt::Display for CheckTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(CheckTier::Basic),
            "functional" => Ok(CheckTier::Functional),
            "content" => Ok(CheckTier::Content),
            "deep" => Ok(CheckTier::Deep),
            _ => Err(format!("Unknown check tier: {}", s)),
        }
    }
}

/// Raw output of one tiered check, before scoring.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub sub_scores: SubScores,
    pub diagnostics: BTreeMap<String, Value>,
    /// Response times of every probe that received an HTTP response.
    pub probe_times_ms: Vec<u64>,
    /// Errors observed along the way, in order.
    pub errors: Vec<ErrorKind>,
    /// `true` when a dead Basic tier stopped escalation.
    pub short_circuited: bool,
}

impl CheckReport {
    pub fn diagnostic(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.diagnostics.insert(key.into(), value.into());
    }

    /// The most severe error observed, if any.
    pub fn dominant_error(&self) -> Option<ErrorKind> {
        self.errors.iter().copied().max_by_key(ErrorKind::severity)
    }

    /// Mean probe response time, or `fallback_ms` when no probe got a response.
    pub fn response_time_ms(&self, fallback_ms: u64) -> u64 {
        if self.probe_times_ms.is_empty() {
            return fallback_ms;
        }
        let total: u64 = self.probe_times_ms.iter().sum();
        total / self.probe_times_ms.len() as u64
    }
}

/// Aggregate relevance across the keywords a Deep check tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepMetrics {
    pub attempted: usize,
    pub with_target_content: usize,
    /// Fraction of keyword fetches whose probe succeeded.
    pub success_rate: f64,
    pub mean_match_score: f64,
}

/// The engine's externally visible verdict for one source.
///
/// Created once per completed assessment and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub source_id: String,
    /// Tier the caller requested.
    pub tier: CheckTier,
    /// Keyword used by the content tiers, if they ran.
    pub keyword: Option<String>,
    pub sub_scores: SubScores,
    pub composite_score: f64,
    pub availability_tier: AvailabilityTier,
    pub available: bool,
    pub response_time_ms: u64,
    pub checked_at: DateTime<Utc>,
    /// Most severe error observed while checking.
    pub error: Option<ErrorKind>,
    pub diagnostics: BTreeMap<String, Value>,
}

impl AssessmentResult {
    pub(crate) fn from_report(
        source_id: &str,
        tier: CheckTier,
        keyword: Option<String>,
        report: CheckReport,
        verdict: ScoreVerdict,
        elapsed_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let response_time_ms = report.response_time_ms(elapsed_ms);
        let error = report.dominant_error();
        let mut diagnostics = report.diagnostics;
        if report.short_circuited {
            diagnostics.insert("short_circuited".to_string(), Value::Bool(true));
        }
        Self {
            source_id: source_id.to_string(),
            tier,
            keyword,
            sub_scores: report.sub_scores,
            composite_score: verdict.composite,
            availability_tier: verdict.tier,
            available: verdict.available,
            response_time_ms,
            checked_at,
            error,
            diagnostics,
        }
    }

    /// A Failing verdict carrying `error` and a human-readable `message`.
    pub fn failing(
        source_id: &str,
        tier: CheckTier,
        error: ErrorKind,
        message: impl Into<String>,
        response_time_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let verdict = ScoreVerdict::failing();
        let mut diagnostics = BTreeMap::new();
        diagnostics.insert("error".to_string(), Value::String(message.into()));
        Self {
            source_id: source_id.to_string(),
            tier,
            keyword: None,
            sub_scores: SubScores::default(),
            composite_score: verdict.composite,
            availability_tier: verdict.tier,
            available: verdict.available,
            response_time_ms,
            checked_at,
            error: Some(error),
            diagnostics,
        }
    }
}
