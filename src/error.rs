//! Error taxonomy shared by probes, analysis and verdicts.
//!
//! Environmental failures are carried as [`ErrorKind`] values inside results; they never
//! escape the engine as Rust errors. Only internal faults surface as
//! [`EngineError`](crate::engine::EngineError).

use serde::{Deserialize, Serialize};

/// Classification of a failure observed while assessing a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Deadline elapsed before a network response arrived.
    Timeout,
    /// Connection refused, DNS failure, TLS failure or an unusable URL.
    Transport,
    /// The endpoint answered with a status that counts as failure.
    Http,
    /// The body could not be interpreted as HTML.
    Parse,
    /// A fault in the engine's own logic.
    Internal,
}

impl ErrorKind {
    /// Returns a stable lowercase label (used in diagnostics and logs).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport",
            ErrorKind::Http => "http",
            ErrorKind::Parse => "parse",
            ErrorKind::Internal => "internal",
        }
    }

    /// Relative severity used to pick the dominant error of an assessment.
    pub(crate) fn severity(&self) -> u8 {
        match self {
            ErrorKind::Internal => 5,
            ErrorKind::Timeout => 4,
            ErrorKind::Transport => 3,
            ErrorKind::Http => 2,
            ErrorKind::Parse => 1,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
