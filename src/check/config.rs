use crate::constants::{
    DEEP_CODE_POOL, DEEP_GENERIC_POOL, DEFAULT_CONTENT_KEYWORD, DEFAULT_MAX_BODY_BYTES,
    FALLBACK_KEYWORDS, FUNCTIONAL_MAX_BODY_BYTES, MAX_FUNCTIONAL_ATTEMPTS,
};

/// Keyword pools and body limits used by the tiered checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Generic keywords tried in turn by the Functional tier.
    pub fallback_keywords: Vec<String>,
    /// Cap on Functional attempts.
    pub max_functional_attempts: usize,
    /// Content keyword when the caller supplies none.
    pub default_keyword: String,
    /// Pools the Deep tier draws one extra keyword from each.
    pub deep_pools: Vec<Vec<String>>,
    /// Body prefix read for Content and Deep pages.
    pub max_body_bytes: usize,
    /// Body prefix read for Functional probes.
    pub functional_max_bytes: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fallback_keywords: FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_functional_attempts: MAX_FUNCTIONAL_ATTEMPTS,
            default_keyword: DEFAULT_CONTENT_KEYWORD.to_string(),
            deep_pools: vec![
                DEEP_CODE_POOL.iter().map(|k| k.to_string()).collect(),
                DEEP_GENERIC_POOL.iter().map(|k| k.to_string()).collect(),
            ],
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            functional_max_bytes: FUNCTIONAL_MAX_BODY_BYTES,
        }
    }
}

impl CheckConfig {
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn fallback_keywords(mut self, keywords: &[&str]) -> Self {
        self.fallback_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn default_keyword(mut self, keyword: &str) -> Self {
        self.default_keyword = keyword.to_string();
        self
    }

    /// Extra Deep keywords for `target`: the first entry of each pool that differs from
    /// the target and from earlier picks.
    pub fn deep_extra_keywords(&self, target: &str) -> Vec<String> {
        let mut picked: Vec<String> = Vec::new();
        for pool in &self.deep_pools {
            let candidate = pool.iter().find(|k| {
                !k.eq_ignore_ascii_case(target) && !picked.iter().any(|p| p.eq_ignore_ascii_case(k))
            });
            if let Some(keyword) = candidate {
                picked.push(keyword.clone());
            }
            if picked.len() == 2 {
                break;
            }
        }
        picked
    }
}
