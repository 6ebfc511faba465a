//! Rolling per-source reliability history.
//!
//! Keeps an all-time tally plus a short window of the latest outcomes so callers can
//! tell "historically flaky" from "currently down". The composite score never reads it.

pub mod tracker;
pub mod types;


pub use tracker::ReliabilityTracker;
pub use types::{OutcomeSample, ReliabilityRecord, ReliabilitySnapshot, Trend};
