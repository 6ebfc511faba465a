use thiserror::Error;

use crate::config::ConfigError;
use crate::probe::ProbeBuildError;
use crate::scoring::ScoringError;

/// Errors surfaced by the engine.
///
/// Construction can fail on configuration or HTTP client setup. Once built, the only
/// error an assessment can return is [`EngineError::Internal`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ProbeBuildError),

    /// A defect in the engine's own logic.
    #[error("internal error: {0}")]
    Internal(#[from] ScoringError),
}

pub type EngineResult<T> = Result<T, EngineError>;
