//! Retry logic.
//!
//! A probe owns one [`RetryState`]. Every transient failure is fed to it and
//! the state answers whether to wait and try again or give up. Keeping this a
//! plain state machine (rather than recursion inside the request path) lets
//! the caller check for cancellation between attempts.

use std::time::Duration;

use crate::resilience::backoff::Backoff;

/// What to do after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then attempt again.
    Retry(Duration),
    /// Retry budget exhausted.
    GiveUp,
}

/// Per-probe retry bookkeeping.
#[derive(Debug, Clone)]
pub struct RetryState {
    max_retries: u32,
    retries: u32,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retries: 0,
        }
    }

    /// Record a transient failure and decide the next step.
    pub fn on_transient_failure(&mut self, backoff: &dyn Backoff) -> RetryDecision {
        if self.retries >= self.max_retries {
            return RetryDecision::GiveUp;
        }
        self.retries += 1;
        RetryDecision::Retry(backoff.delay(self.retries))
    }

    /// Number of retries granted so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Transport failures are worth another attempt; anything that produced an
/// HTTP response, or never left the builder, is not.
pub fn is_retryable(err: &reqwest::Error) -> bool {
    if err.is_builder() || err.is_status() || err.is_decode() || err.is_redirect() {
        return false;
    }
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}
