//! Content relevance analysis.
//!
//! Parses a fetched page, looks for the target keyword, estimates how many results the
//! page lists and derives a `[0, 1]` match score plus a coarse quality label. Pages that
//! cannot be interpreted as HTML produce a zeroed result flagged `parse_failed`; callers
//! treat that exactly like "no content match".

pub mod analyzer;
pub mod types;


pub use analyzer::ContentAnalyzer;
pub use types::{ContentQuality, PageSignals, RelevanceResult};
