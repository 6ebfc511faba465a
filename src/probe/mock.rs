//! Deterministic in-memory [`Prober`] for tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::executor::Prober;
use super::types::{ProbeMethod, ProbeOutcome, ProbeRequest};
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockBehavior {
    Respond,
    TransportError,
    Hang,
    Panic,
}

/// Canned response served by [`MockProber`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: Vec<u8>,
    content_type: Option<String>,
    delay: Duration,
    behavior: MockBehavior,
}

impl MockResponse {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            content_type: None,
            delay: Duration::ZERO,
            behavior: MockBehavior::Respond,
        }
    }

    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into().into_bytes(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            ..Self::ok()
        }
    }

    pub fn transport_error() -> Self {
        Self {
            behavior: MockBehavior::TransportError,
            ..Self::ok()
        }
    }

    /// Never answers; the probe ends at its deadline.
    pub fn hang() -> Self {
        Self {
            behavior: MockBehavior::Hang,
            ..Self::ok()
        }
    }

    /// Panics inside the probe call.
    pub fn panic() -> Self {
        Self {
            behavior: MockBehavior::Panic,
            ..Self::ok()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Routes probes by URL substring; the first matching route wins.
pub struct MockProber {
    routes: RwLock<Vec<(String, MockResponse)>>,
    fallback: MockResponse,
    calls: Mutex<Vec<ProbeRequest>>,
}

impl MockProber {
    /// Creates a prober that answers `200 OK` to anything unrouted.
    pub fn new() -> Self {
        Self::with_fallback(MockResponse::ok())
    }

    pub fn with_fallback(fallback: MockResponse) -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn route(self, pattern: &str, response: MockResponse) -> Self {
        self.add_route(pattern, response);
        self
    }

    pub fn add_route(&self, pattern: &str, response: MockResponse) {
        self.routes.write().push((pattern.to_string(), response));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<ProbeRequest> {
        self.calls.lock().clone()
    }

    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.url.contains(pattern))
            .count()
    }

    fn resolve(&self, url: &str) -> MockResponse {
        self.routes
            .read()
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProber")
            .field("routes", &self.routes.read().len())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, request: ProbeRequest) -> ProbeOutcome {
        let start = Instant::now();
        self.calls.lock().push(request.clone());
        let response = self.resolve(&request.url);

        match response.behavior {
            MockBehavior::Panic => panic!("mock probe panicked for {}", request.url),
            MockBehavior::Hang => {
                tokio::time::sleep(request.timeout).await;
                return ProbeOutcome::timeout(start.elapsed());
            }
            MockBehavior::TransportError | MockBehavior::Respond => {}
        }

        if response.delay >= request.timeout {
            tokio::time::sleep(request.timeout).await;
            return ProbeOutcome::timeout(start.elapsed());
        }
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }

        if response.behavior == MockBehavior::TransportError {
            return ProbeOutcome::failure(
                ErrorKind::Transport,
                "connection refused",
                start.elapsed(),
            );
        }

        let (body, truncated) = match request.method {
            ProbeMethod::Head => (None, false),
            ProbeMethod::Get => {
                let mut body = response.body.clone();
                let truncated = request.max_bytes.is_some_and(|limit| body.len() > limit);
                if let Some(limit) = request.max_bytes {
                    body.truncate(limit);
                }
                (Some(body), truncated)
            }
        };

        ProbeOutcome::from_response(
            response.status,
            start.elapsed(),
            body,
            truncated,
            response.content_type,
            Some(request.url),
        )
    }
}
