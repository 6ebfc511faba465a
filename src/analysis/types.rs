use serde::{Deserialize, Serialize};

use crate::constants::TARGET_CONTENT_THRESHOLD;

/// Coarse quality label derived from a point sum (max 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentQuality {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl ContentQuality {
    pub const MAX_POINTS: u8 = 7;

    pub fn from_points(points: u8) -> Self {
        match points {
            6.. => ContentQuality::Excellent,
            4..=5 => ContentQuality::Good,
            2..=3 => ContentQuality::Moderate,
            _ => ContentQuality::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentQuality::Excellent => "excellent",
            ContentQuality::Good => "good",
            ContentQuality::Moderate => "moderate",
            ContentQuality::Poor => "poor",
        }
    }
}

impl std::fmt::Display for ContentQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural "shape" of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSignals {
    pub has_search_results: bool,
    pub has_navigation: bool,
    pub has_pagination: bool,
    pub has_media: bool,
    pub media_count: usize,
}

/// Outcome of analysing one page against one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub has_target_content: bool,
    pub match_score: f64,
    pub keyword_found: bool,
    pub title_match: bool,
    pub direct_matches: usize,
    pub estimated_result_count: u64,
    pub quality: ContentQuality,
    pub quality_points: u8,
    pub signals: PageSignals,
    pub parse_failed: bool,
}

impl RelevanceResult {
    /// Zeroed result for a page that was never fetched.
    pub fn empty() -> Self {
        Self {
            parse_failed: false,
            ..Self::parse_failed()
        }
    }

    /// Zeroed result for a page that could not be interpreted as HTML.
    pub fn parse_failed() -> Self {
        Self {
            has_target_content: false,
            match_score: 0.0,
            keyword_found: false,
            title_match: false,
            direct_matches: 0,
            estimated_result_count: 0,
            quality: ContentQuality::Poor,
            quality_points: 0,
            signals: PageSignals::default(),
            parse_failed: true,
        }
    }

    /// Applies the fixed target-content threshold to a match score.
    pub fn exceeds_target_threshold(match_score: f64) -> bool {
        match_score > TARGET_CONTENT_THRESHOLD
    }
}
