//! Engine entry points: single assessment and batch scheduling.
//!
//! An assessment consults the cache, runs the tiered check under one overall deadline,
//! scores the sub-scores that were produced, then stores the verdict and records it in
//! the reliability history. The cache and tracker are the only shared mutable state and
//! no lock on them is held across a probe.

pub mod assessor;
pub mod batch;
pub mod error;
pub mod types;


pub use assessor::Engine;
pub use error::{EngineError, EngineResult};
pub use types::{AssessOptions, BatchOptions, StatsSnapshot};
