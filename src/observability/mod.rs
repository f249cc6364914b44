//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Prober, pool, orchestrator produce:
//!     → logging.rs (structured events to the run log file)
//!     → logging::WIRE_TARGET (request/response traces, debug level)
//!     → metrics.rs (counters, gauge, histogram)
//! ```
//!
//! # Design Decisions
//! - One subscriber per process, installed by main before the run
//! - Each run is wrapped in a span carrying a UUID run id
//! - Metrics are only exported when an address is configured

pub mod logging;
pub mod metrics;
