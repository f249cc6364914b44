//! Linear backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

/// Delay policy consulted before each retry.
///
/// `attempt` is 1 for the first retry, 2 for the second, and so on.
pub trait Backoff: Send + Sync {
    fn delay(&self, attempt: u32) -> Duration;
}

/// Waits `attempt * unit`, plus up to `jitter_ratio` of that as random slack.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    unit: Duration,
    jitter_ratio: f64,
}

impl LinearBackoff {
    pub fn new(unit: Duration) -> Self {
        Self {
            unit,
            jitter_ratio: 0.0,
        }
    }

    pub fn with_jitter(mut self, ratio: f64) -> Self {
        self.jitter_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

impl Backoff for LinearBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.unit, self.jitter_ratio)
    }
}

/// Calculate a linear backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, unit: Duration, jitter_ratio: f64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let base = unit.saturating_mul(attempt);
    let jitter_range = base.mul_f64(jitter_ratio);
    if jitter_range.is_zero() {
        return base;
    }

    let jitter = rand::thread_rng().gen_range(Duration::ZERO..jitter_range);
    base + jitter
}
