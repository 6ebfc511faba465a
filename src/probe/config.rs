use crate::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};

/// Client-level settings shared by every probe an [`HttpProber`](super::HttpProber) issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProberConfig {
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
    /// Maximum redirects followed before the probe fails.
    pub max_redirects: usize,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}
