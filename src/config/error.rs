//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating [`EngineConfig`](super::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    ParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A value parsed but violates an invariant.
    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
