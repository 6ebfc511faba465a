use std::borrow::Cow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    Head,
    Get,
}

impl std::fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeMethod::Head => f.write_str("HEAD"),
            ProbeMethod::Get => f.write_str("GET"),
        }
    }
}

/// A single bounded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    pub method: ProbeMethod,
    /// Hard deadline for the whole attempt, body read included.
    pub timeout: Duration,
    /// For GET probes, stop reading after this many body bytes.
    pub max_bytes: Option<usize>,
}

impl ProbeRequest {
    pub fn head(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: ProbeMethod::Head,
            timeout,
            max_bytes: None,
        }
    }

    pub fn get(url: impl Into<String>, timeout: Duration, max_bytes: Option<usize>) -> Self {
        Self {
            url: url.into(),
            method: ProbeMethod::Get,
            timeout,
            max_bytes,
        }
    }
}

/// Returns `true` unless the status is a server error or says the endpoint is gone.
#[inline]
pub fn is_success_status(status: u16) -> bool {
    !(500..600).contains(&status) && status != 404 && status != 410
}

/// Raw result of one probe attempt. Created fresh per attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    pub http_status: Option<u16>,
    pub response_time_ms: u64,
    pub body: Option<Vec<u8>>,
    /// `true` when the body was cut at `max_bytes`.
    pub truncated: bool,
    pub content_type: Option<String>,
    /// URL of the final response after redirects.
    pub final_url: Option<String>,
    pub error: Option<ErrorKind>,
    pub error_message: Option<String>,
}

impl ProbeOutcome {
    /// Builds an outcome from a received response; success follows [`is_success_status`].
    pub fn from_response(
        status: u16,
        elapsed: Duration,
        body: Option<Vec<u8>>,
        truncated: bool,
        content_type: Option<String>,
        final_url: Option<String>,
    ) -> Self {
        let success = is_success_status(status);
        Self {
            success,
            http_status: Some(status),
            response_time_ms: elapsed_ms(elapsed),
            body,
            truncated,
            content_type,
            final_url,
            error: (!success).then_some(ErrorKind::Http),
            error_message: (!success).then(|| format!("HTTP status {status}")),
        }
    }

    /// Builds a failed outcome with no response.
    pub fn failure(kind: ErrorKind, message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            http_status: None,
            response_time_ms: elapsed_ms(elapsed),
            body: None,
            truncated: false,
            content_type: None,
            final_url: None,
            error: Some(kind),
            error_message: Some(message.into()),
        }
    }

    pub fn timeout(elapsed: Duration) -> Self {
        Self::failure(
            ErrorKind::Timeout,
            format!("no response within {}ms", elapsed_ms(elapsed)),
            elapsed,
        )
    }

    /// Returns the body as text (lossy), if any was read.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body.as_deref().map(String::from_utf8_lossy)
    }

    /// Returns `true` if the response declared an HTML (or XHTML) content type.
    ///
    /// A missing content type is treated as HTML; many search pages omit it.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml")
            }
        }
    }
}

pub(crate) fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
