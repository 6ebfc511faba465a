use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument};

use super::config::CheckConfig;
use super::types::{CheckReport, CheckTier, DeepMetrics};
use crate::analysis::{ContentAnalyzer, RelevanceResult};
use crate::constants::{BASIC_CONNECTIVITY_THRESHOLD, BASIC_RESOLUTION_PATH, BASIC_STATIC_PATH};
use crate::error::ErrorKind;
use crate::probe::{ProbeOutcome, ProbeRequest, Prober};
use crate::source::SourceDescriptor;

/// One keyword fetch handed to the analyzer.
struct ContentFetch {
    relevance: RelevanceResult,
    probe_success: bool,
    diagnostic: Value,
}

/// Runs Basic → Functional → Content → Deep against a source.
pub struct TieredChecker {
    prober: Arc<dyn Prober>,
    analyzer: ContentAnalyzer,
    config: CheckConfig,
}

impl std::fmt::Debug for TieredChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TieredChecker {
    pub fn new(prober: Arc<dyn Prober>, config: CheckConfig) -> Self {
        Self {
            prober,
            analyzer: ContentAnalyzer::new(),
            config,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Keyword the Content and Deep tiers use for `keyword`.
    pub fn content_keyword(&self, keyword: Option<&str>) -> String {
        keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(&self.config.default_keyword)
            .to_string()
    }

    /// Runs every tier up to `requested`, splitting `budget` evenly across them.
    ///
    /// Inside a tier each probe gets an even share of the time still left, so one
    /// unresponsive keyword cannot starve the ones after it.
    #[instrument(skip(self, source, keyword), fields(source_id = %source.id, tier = %requested))]
    pub async fn run(
        &self,
        source: &SourceDescriptor,
        requested: CheckTier,
        keyword: Option<&str>,
        budget: Duration,
    ) -> CheckReport {
        let mut report = CheckReport::default();
        let tier_budget = budget / requested.depth();
        let target = self.content_keyword(keyword);

        for tier in CheckTier::ALL.into_iter().take(requested.depth() as usize) {
            let deadline = Instant::now() + tier_budget;
            let outcome = timeout_at(
                deadline,
                self.run_tier(tier, source, &target, deadline, &mut report),
            )
            .await;

            let score = match outcome {
                Ok(score) => score,
                Err(_) => {
                    report.errors.push(ErrorKind::Timeout);
                    report.diagnostic(format!("{tier}.timed_out"), true);
                    // Keeps whatever the finished attempts already scored.
                    report.sub_scores.get(tier).unwrap_or(0.0)
                }
            };
            report.sub_scores.set(tier, score);
            debug!(tier = %tier, score, "Tier finished");

            if tier == CheckTier::Basic
                && requested > CheckTier::Basic
                && score <= BASIC_CONNECTIVITY_THRESHOLD
            {
                debug!("No basic connectivity, skipping higher tiers");
                report.short_circuited = true;
                break;
            }
        }

        report
    }

    async fn run_tier(
        &self,
        tier: CheckTier,
        source: &SourceDescriptor,
        target: &str,
        deadline: Instant,
        report: &mut CheckReport,
    ) -> f64 {
        match tier {
            CheckTier::Basic => self.run_basic(source, deadline, report).await,
            CheckTier::Functional => self.run_functional(source, deadline, report).await,
            CheckTier::Content => self.run_content(source, target, deadline, report).await,
            CheckTier::Deep => self.run_deep(source, target, deadline, report).await,
        }
    }

    /// Three concurrent HEAD probes: a static path, the origin and a second static path.
    async fn run_basic(
        &self,
        source: &SourceDescriptor,
        deadline: Instant,
        report: &mut CheckReport,
    ) -> f64 {
        let paths = [
            ("resolution", BASIC_RESOLUTION_PATH),
            ("base", "/"),
            ("static", BASIC_STATIC_PATH),
        ];
        let urls = paths
            .iter()
            .map(|(label, path)| source.origin_path(path).map(|url| (*label, url)))
            .collect::<Result<Vec<_>, _>>();
        let checks = match urls {
            Ok(checks) => checks,
            Err(e) => {
                report.errors.push(ErrorKind::Transport);
                report.diagnostic("source.error", e.to_string());
                report.diagnostic("basic.connectivity", false);
                return 0.0;
            }
        };

        let budget = share_of_remaining(deadline, 1);
        let outcomes = join_all(
            checks
                .iter()
                .map(|(_, url)| self.prober.probe(ProbeRequest::head(url.clone(), budget))),
        )
        .await;

        let mut details = Vec::with_capacity(checks.len());
        let mut succeeded = 0usize;
        for ((label, url), outcome) in checks.iter().zip(&outcomes) {
            record_outcome(report, outcome);
            if outcome.success {
                succeeded += 1;
            }
            details.push(probe_diagnostic(label, url, outcome));
        }

        let score = succeeded as f64 / checks.len() as f64;
        report.diagnostic("basic.checks", details);
        report.diagnostic("basic.connectivity", score > BASIC_CONNECTIVITY_THRESHOLD);
        score
    }

    /// Tries fallback keywords in turn, stopping at the first working search.
    async fn run_functional(
        &self,
        source: &SourceDescriptor,
        deadline: Instant,
        report: &mut CheckReport,
    ) -> f64 {
        let keywords: Vec<&String> = self
            .config
            .fallback_keywords
            .iter()
            .take(self.config.max_functional_attempts)
            .collect();
        let mut attempts = Vec::with_capacity(keywords.len());
        let mut working_keyword = None;
        let mut score = 0.0;

        for (i, keyword) in keywords.iter().enumerate() {
            let url = source.render(keyword);
            let outcome = self
                .prober
                .probe(ProbeRequest::get(
                    url.clone(),
                    share_of_remaining(deadline, keywords.len() - i),
                    Some(self.config.functional_max_bytes),
                ))
                .await;
            record_outcome(report, &outcome);
            attempts.push(probe_diagnostic(keyword, &url, &outcome));
            report.diagnostic("functional.attempts", attempts.clone());

            if outcome.success {
                working_keyword = Some(keyword.to_string());
                score = 1.0 / attempts.len() as f64;
            }
            report.sub_scores.set(CheckTier::Functional, score);
            if working_keyword.is_some() {
                break;
            }
        }

        report.diagnostic("functional.search_functional", working_keyword.is_some());
        if let Some(keyword) = working_keyword {
            report.diagnostic("functional.keyword", keyword);
        }
        score
    }

    async fn run_content(
        &self,
        source: &SourceDescriptor,
        target: &str,
        deadline: Instant,
        report: &mut CheckReport,
    ) -> f64 {
        let budget = share_of_remaining(deadline, 1);
        let fetch = self.fetch_content(source, target, budget, report).await;
        report.diagnostic("content.keyword", target);
        report.diagnostic("content.relevance", to_json(&fetch.relevance));
        report.diagnostic("content.probe", fetch.diagnostic);
        fetch.relevance.match_score
    }

    /// Repeats the Content step for the target and up to two pool keywords.
    async fn run_deep(
        &self,
        source: &SourceDescriptor,
        target: &str,
        deadline: Instant,
        report: &mut CheckReport,
    ) -> f64 {
        let mut keywords = vec![target.to_string()];
        keywords.extend(self.config.deep_extra_keywords(target));

        let mut per_keyword = Vec::with_capacity(keywords.len());
        let mut with_target_content = 0usize;
        let mut probes_ok = 0usize;
        let mut match_sum = 0.0;

        for (i, keyword) in keywords.iter().enumerate() {
            let budget = share_of_remaining(deadline, keywords.len() - i);
            let fetch = self.fetch_content(source, keyword, budget, report).await;
            if fetch.relevance.has_target_content {
                with_target_content += 1;
            }
            if fetch.probe_success {
                probes_ok += 1;
            }
            match_sum += fetch.relevance.match_score;
            per_keyword.push(json!({
                "keyword": keyword,
                "has_target_content": fetch.relevance.has_target_content,
                "match_score": fetch.relevance.match_score,
                "quality": fetch.relevance.quality,
                "probe": fetch.diagnostic,
            }));
            report.diagnostic("deep.keywords", per_keyword.clone());
            report.sub_scores.set(
                CheckTier::Deep,
                with_target_content as f64 / per_keyword.len() as f64,
            );
        }

        let attempted = keywords.len();
        let metrics = DeepMetrics {
            attempted,
            with_target_content,
            success_rate: probes_ok as f64 / attempted as f64,
            mean_match_score: match_sum / attempted as f64,
        };

        report.diagnostic("deep.quality_metrics", to_json(&metrics));
        with_target_content as f64 / attempted as f64
    }

    async fn fetch_content(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        budget: Duration,
        report: &mut CheckReport,
    ) -> ContentFetch {
        let url = source.render(keyword);
        let outcome = self
            .prober
            .probe(ProbeRequest::get(
                url.clone(),
                budget,
                Some(self.config.max_body_bytes),
            ))
            .await;
        record_outcome(report, &outcome);

        let relevance = if outcome.success {
            let relevance = self.analyzer.analyze_outcome(&outcome, keyword);
            if relevance.parse_failed {
                report.errors.push(ErrorKind::Parse);
            }
            relevance
        } else {
            RelevanceResult::empty()
        };

        ContentFetch {
            relevance,
            probe_success: outcome.success,
            diagnostic: probe_diagnostic(keyword, &url, &outcome),
        }
    }
}

/// Even share of the time left before `deadline` for each of `steps` remaining probes.
fn share_of_remaining(deadline: Instant, steps: usize) -> Duration {
    let remaining = deadline.saturating_duration_since(Instant::now());
    remaining / u32::try_from(steps.max(1)).unwrap_or(u32::MAX)
}

fn record_outcome(report: &mut CheckReport, outcome: &ProbeOutcome) {
    if outcome.http_status.is_some() {
        report.probe_times_ms.push(outcome.response_time_ms);
    }
    if let Some(error) = outcome.error {
        report.errors.push(error);
    }
}

fn probe_diagnostic(label: &str, url: &str, outcome: &ProbeOutcome) -> Value {
    json!({
        "label": label,
        "url": url,
        "success": outcome.success,
        "status": outcome.http_status,
        "response_time_ms": outcome.response_time_ms,
        "truncated": outcome.truncated,
        "error": outcome.error.map(|e| e.as_str()),
        "message": outcome.error_message,
    })
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
