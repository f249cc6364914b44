//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the checker.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the checker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CheckerConfig {
    /// How a single endpoint is probed.
    pub probe: ProbeConfig,

    /// Retry configuration for transport failures.
    pub retries: RetryConfig,

    /// Worker pool sizing.
    pub pool: PoolSizingConfig,

    /// Run-wide lifecycle settings.
    pub run: RunConfig,

    /// Export and log file locations.
    pub output: OutputConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Inventory path appended to every endpoint.
    pub path: String,

    /// Total per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// User-Agent header sent with every probe.
    pub user_agent: String,

    /// Require a non-empty digest on a model descriptor for it to count.
    pub require_digest: bool,

    /// How much of a non-200 body is kept in the error message.
    pub body_snippet_bytes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: "/api/tags".to_string(),
            timeout_ms: 5_000,
            connect_timeout_ms: 3_000,
            user_agent: concat!("ollama-checker/", env!("CARGO_PKG_VERSION")).to_string(),
            require_digest: false,
            body_snippet_bytes: 1024,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// Linear backoff unit in milliseconds (retry N waits N units).
    pub backoff_unit_ms: u64,

    /// Random extra delay as a fraction of the computed backoff (0.0 disables).
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit_ms: 500,
            jitter_ratio: 0.0,
        }
    }
}

impl RetryConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

/// Worker pool sizing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolSizingConfig {
    /// Floor for dynamic sizing.
    pub min_workers: usize,

    /// Ceiling for dynamic sizing.
    pub max_workers: usize,

    /// Use exactly this many workers instead of sizing from the task count.
    pub fixed_workers: Option<usize>,
}

impl Default for PoolSizingConfig {
    fn default() -> Self {
        Self {
            min_workers: 3,
            max_workers: 20,
            fixed_workers: None,
        }
    }
}

/// Run lifecycle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Overall deadline in seconds. Unclaimed jobs are skipped once it fires.
    pub deadline_secs: Option<u64>,
}

impl RunConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file receiving the healthy endpoints.
    pub csv_path: PathBuf,

    /// Directory for per-run log files.
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("healthy_endpoints.csv"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus exporter bind address; no exporter when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
