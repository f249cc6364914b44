//! HTTP prober for the inventory endpoint.
//!
//! # Responsibilities
//! - Build `GET <endpoint><path>` with a per-request timeout
//! - Retry transport failures with linear backoff
//! - Drain every response body, then classify it
//! - Fold every failure into a [`ProbeResult`]

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{ProbeConfig, RetryConfig};
use crate::lifecycle::sleep_with_shutdown;
use crate::observability::logging::WIRE_TARGET;
use crate::observability::metrics;
use crate::probe::inventory::classify_body;
use crate::probe::types::{ProbeError, ProbeResult};
use crate::resilience::backoff::{Backoff, LinearBackoff};
use crate::resilience::retries::{is_retryable, RetryDecision, RetryState};

/// Anything that can turn an endpoint into a classified result.
///
/// Implementations must not fail past this boundary.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, endpoint: &str, cancel: &CancellationToken) -> ProbeResult;
}

/// Failure of a single attempt, before retry policy is applied.
#[derive(Debug)]
enum AttemptError {
    Transient(String),
    Terminal(ProbeError),
}

/// Probes endpoints over HTTP with `reqwest`.
pub struct HttpProber {
    client: Client,
    config: ProbeConfig,
    max_retries: u32,
    backoff: Arc<dyn Backoff>,
}

impl HttpProber {
    /// Create a prober. Fails only if the TLS backend cannot initialise.
    pub fn new(config: ProbeConfig, retries: &RetryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        let backoff = LinearBackoff::new(retries.backoff_unit()).with_jitter(retries.jitter_ratio);

        Ok(Self {
            client,
            config,
            max_retries: retries.max_retries,
            backoff: Arc::new(backoff),
        })
    }

    /// Replace the backoff policy.
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Full inventory URL for an endpoint.
    pub fn inventory_url(&self, endpoint: &str) -> Result<Url, ProbeError> {
        let base = endpoint.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{}{}", base, self.config.path))
            .map_err(|e| ProbeError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ProbeError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                endpoint, other
            ))),
        }
    }

    async fn attempt(&self, url: &Url) -> Result<Vec<String>, AttemptError> {
        tracing::debug!(
            target: WIRE_TARGET,
            method = "GET",
            url = %url,
            accept = "application/json",
            user_agent = %self.config.user_agent,
            "request →"
        );

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!(
            target: WIRE_TARGET,
            url = %url,
            status = %status,
            headers = ?response.headers(),
            "response ←"
        );

        // Read to the end whatever the status, so the connection can be reused.
        let body = match response.bytes().await {
            Ok(body) => body,
            // A status already arrived; it is the answer even without a body.
            Err(e) if status != StatusCode::OK => {
                tracing::debug!(target: WIRE_TARGET, url = %url, error = %describe(&e), "response body unreadable");
                return Err(AttemptError::Terminal(ProbeError::Status {
                    status: status.as_u16(),
                    body: String::new(),
                }));
            }
            Err(e) => return Err(transport_error(e)),
        };
        let snippet = body_snippet(&body, self.config.body_snippet_bytes);
        tracing::debug!(target: WIRE_TARGET, url = %url, bytes = body.len(), body = %snippet, "response body");

        if status != StatusCode::OK {
            return Err(AttemptError::Terminal(ProbeError::Status {
                status: status.as_u16(),
                body: snippet,
            }));
        }

        classify_body(&body, self.config.require_digest).map_err(AttemptError::Terminal)
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, endpoint: &str, cancel: &CancellationToken) -> ProbeResult {
        let started = Instant::now();

        let result = match self.inventory_url(endpoint) {
            Ok(url) => self.probe_with_retries(endpoint, &url, cancel).await,
            Err(e) => ProbeResult::unhealthy(endpoint, e, 0),
        };

        match &result.error {
            None => tracing::info!(
                endpoint = %endpoint,
                models = result.models.len(),
                retries = result.retries,
                "Endpoint healthy"
            ),
            Some(e) => tracing::warn!(
                endpoint = %endpoint,
                kind = e.kind(),
                retries = result.retries,
                error = %e,
                "Endpoint unhealthy"
            ),
        }
        metrics::record_probe(&result, started);
        result
    }
}

impl HttpProber {
    async fn probe_with_retries(&self, endpoint: &str, url: &Url, cancel: &CancellationToken) -> ProbeResult {
        let mut retry = RetryState::new(self.max_retries);

        loop {
            let message = match self.attempt(url).await {
                Ok(models) => return ProbeResult::healthy(endpoint, models, retry.retries()),
                Err(AttemptError::Terminal(e)) => return ProbeResult::unhealthy(endpoint, e, retry.retries()),
                Err(AttemptError::Transient(message)) => message,
            };

            match retry.on_transient_failure(self.backoff.as_ref()) {
                RetryDecision::Retry(delay) => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        attempt = retry.retries(),
                        delay = ?delay,
                        error = %message,
                        "Retrying after transport error"
                    );
                    metrics::record_retry();
                    if sleep_with_shutdown(delay, cancel).await {
                        return ProbeResult::unhealthy(endpoint, ProbeError::Cancelled, retry.retries());
                    }
                }
                RetryDecision::GiveUp => {
                    return ProbeResult::unhealthy(endpoint, ProbeError::Transport(message), retry.retries());
                }
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> AttemptError {
    let message = describe(&err);
    if is_retryable(&err) {
        AttemptError::Transient(message)
    } else {
        AttemptError::Terminal(ProbeError::Transport(message))
    }
}

/// reqwest's top-level message hides the cause; append the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn body_snippet(body: &[u8], limit: usize) -> String {
    let end = body.len().min(limit);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}
