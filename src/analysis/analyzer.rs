use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::types::{ContentQuality, PageSignals, RelevanceResult};
use crate::probe::ProbeOutcome;

/// Element patterns that usually wrap one search result each.
const RESULT_PATTERNS: &[&str] = &[
    "[class*='result']",
    "[class*='card']",
    "[class*='item']",
    "[class*='movie']",
    "[class*='video']",
    "[class*='list'] > li",
    "[data-testid*='result']",
    "article",
];

const NAVIGATION_PATTERNS: &[&str] = &["nav", "[role='navigation']", "[class*='nav']", "header"];

const PAGINATION_PATTERNS: &[&str] = &[
    "[class*='pagination']",
    "[class*='pager']",
    "[class*='page-link']",
    "a[rel='next']",
];

/// Text patterns like "1,234 results" or "共 56 件", English, Chinese and Japanese.
const COUNT_PATTERNS: &[&str] = &[
    r"(?i)(\d[\d,]*)\s*(?:results?|items?|videos?|matches|titles)\b",
    r"(?i)(?:found|total|about)\s*:?\s*(\d[\d,]*)",
    r"(?:共|找到|全|約)\s*(\d[\d,]*)\s*(?:个|個|条|條|件|部|本)?",
    r"(\d[\d,]*)\s*(?:件|个结果|個結果|条结果|條結果|部影片)",
];

/// Minimum structural matches for a page to count as a result list.
const MIN_RESULT_LIST_LEN: usize = 2;
/// Minimum images/videos for the media signal.
const MIN_MEDIA_COUNT: usize = 3;

struct Patterns {
    results: Vec<Selector>,
    navigation: Vec<Selector>,
    pagination: Vec<Selector>,
    title: Option<Selector>,
    media: Option<Selector>,
    counts: Vec<Regex>,
}

fn selectors(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .filter_map(|p| Selector::parse(p).ok())
        .collect()
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    results: selectors(RESULT_PATTERNS),
    navigation: selectors(NAVIGATION_PATTERNS),
    pagination: selectors(PAGINATION_PATTERNS),
    title: Selector::parse("title").ok(),
    media: Selector::parse("img, video").ok(),
    counts: COUNT_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect(),
});

/// Scores how well a page matches a target keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentAnalyzer;

impl ContentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes the body of a probe, degrading to [`RelevanceResult::parse_failed`] when the
    /// probe carried no body or a non-HTML content type.
    pub fn analyze_outcome(&self, outcome: &ProbeOutcome, keyword: &str) -> RelevanceResult {
        if !outcome.is_html() {
            debug!(content_type = ?outcome.content_type, "Skipping non-HTML body");
            return RelevanceResult::parse_failed();
        }
        match outcome.body_text() {
            Some(body) => self.analyze(&body, keyword),
            None => RelevanceResult::parse_failed(),
        }
    }

    pub fn analyze(&self, html: &str, keyword: &str) -> RelevanceResult {
        if !looks_like_markup(html) {
            return RelevanceResult::parse_failed();
        }

        let document = Html::parse_document(html);
        let patterns = &*PATTERNS;
        let keyword = keyword.trim().to_lowercase();

        let text = document.root_element().text().collect::<String>();
        let text_lower = text.to_lowercase();

        let direct_matches = if keyword.is_empty() {
            0
        } else {
            text_lower.matches(keyword.as_str()).count()
        };
        let keyword_found = direct_matches > 0;

        let title_match = !keyword.is_empty()
            && patterns
                .title
                .as_ref()
                .and_then(|sel| document.select(sel).next())
                .map(|title| {
                    title
                        .text()
                        .collect::<String>()
                        .to_lowercase()
                        .contains(keyword.as_str())
                })
                .unwrap_or(false);

        let structural_count = max_match_count(&document, &patterns.results);
        let estimated_result_count = if structural_count > 0 {
            structural_count as u64
        } else {
            count_from_text(&text, &patterns.counts)
        };

        let media_count = patterns
            .media
            .as_ref()
            .map(|sel| document.select(sel).count())
            .unwrap_or(0);

        let signals = PageSignals {
            has_search_results: structural_count >= MIN_RESULT_LIST_LEN,
            has_navigation: any_match(&document, &patterns.navigation),
            has_pagination: any_match(&document, &patterns.pagination),
            has_media: media_count >= MIN_MEDIA_COUNT,
            media_count,
        };

        // Weights 0.4 / 0.3 / 0.2 / 0.1, summed in integer tenths.
        let tenths = 4 * u8::from(keyword_found)
            + 3 * u8::from(title_match)
            + 2 * u8::from(estimated_result_count > 0)
            + u8::from(signals.has_search_results);
        let match_score = (f64::from(tenths) / 10.0).clamp(0.0, 1.0);

        let quality_points = 2 * u8::from(keyword_found)
            + 2 * u8::from(title_match)
            + u8::from(estimated_result_count > 0)
            + u8::from(signals.has_search_results)
            + u8::from(signals.has_pagination || signals.has_media);

        RelevanceResult {
            has_target_content: RelevanceResult::exceeds_target_threshold(match_score),
            match_score,
            keyword_found,
            title_match,
            direct_matches,
            estimated_result_count,
            quality: ContentQuality::from_points(quality_points),
            quality_points,
            signals,
            parse_failed: false,
        }
    }
}

fn looks_like_markup(body: &str) -> bool {
    let trimmed = body.trim_start();
    !trimmed.is_empty() && trimmed.contains('<') && !trimmed.starts_with('{')
}

fn max_match_count(document: &Html, selectors: &[Selector]) -> usize {
    selectors
        .iter()
        .map(|sel| document.select(sel).count())
        .max()
        .unwrap_or(0)
}

fn any_match(document: &Html, selectors: &[Selector]) -> bool {
    selectors
        .iter()
        .any(|sel| document.select(sel).next().is_some())
}

fn count_from_text(text: &str, patterns: &[Regex]) -> u64 {
    patterns
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse::<u64>().ok())
        .find(|count| *count > 0)
        .unwrap_or(0)
}
