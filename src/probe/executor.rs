use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, redirect};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument};

use super::config::ProberConfig;
use super::types::{ProbeMethod, ProbeOutcome, ProbeRequest};
use crate::error::ErrorKind;

/// Issues single bounded HTTP requests.
///
/// Implementations must never block past `request.timeout` and must never return an
/// error: every failure is reported through [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, request: ProbeRequest) -> ProbeOutcome;
}

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ProbeBuildError(#[from] reqwest::Error);

/// [`Prober`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &ProberConfig) -> Result<Self, ProbeBuildError> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    async fn execute(&self, request: &ProbeRequest, start: Instant) -> ProbeOutcome {
        let builder = match request.method {
            ProbeMethod::Head => self.client.head(&request.url),
            ProbeMethod::Get => self.client.get(&request.url),
        };

        let response = match builder.timeout(request.timeout).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::failure(classify(&e), e.to_string(), start.elapsed()),
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let final_url = Some(response.url().to_string());

        if request.method == ProbeMethod::Head {
            return ProbeOutcome::from_response(
                status,
                start.elapsed(),
                None,
                false,
                content_type,
                final_url,
            );
        }

        match read_body(response, request.max_bytes).await {
            Ok((body, truncated)) => ProbeOutcome::from_response(
                status,
                start.elapsed(),
                Some(body),
                truncated,
                content_type,
                final_url,
            ),
            Err(e) => ProbeOutcome::failure(classify(&e), e.to_string(), start.elapsed()),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn probe(&self, request: ProbeRequest) -> ProbeOutcome {
        let start = Instant::now();

        // Dropping the in-flight future on expiry aborts the connection.
        let outcome = match timeout(request.timeout, self.execute(&request, start)).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::timeout(start.elapsed()),
        };

        debug!(
            success = outcome.success,
            status = outcome.http_status,
            elapsed_ms = outcome.response_time_ms,
            truncated = outcome.truncated,
            error = outcome.error.map(|e| e.as_str()),
            "Probe finished"
        );
        outcome
    }
}

/// Reads at most `max_bytes` of body, returning early once the limit is reached.
async fn read_body(
    mut response: Response,
    max_bytes: Option<usize>,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if let Some(limit) = max_bytes {
            if body.len() >= limit {
                body.truncate(limit);
                return Ok((body, true));
            }
        }
    }
    Ok((body, false))
}

fn classify(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Transport
    }
}
