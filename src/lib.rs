//! Concurrent health checker for model servers exposing `/api/tags`.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod pool;
pub mod probe;
pub mod report;
pub mod resilience;

pub use aggregate::RunSummary;
pub use config::CheckerConfig;
pub use error::{Error, Result};
pub use lifecycle::Shutdown;
pub use orchestrator::Checker;
pub use probe::{ProbeError, ProbeResult};
