//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe attempt fails:
//!     → retries.rs (transport failure? consult RetryState)
//!     → backoff.rs (linear delay for the attempt number)
//!     → sleep, unless the run is cancelled meanwhile
//! ```
//!
//! # Design Decisions
//! - Every request carries its own timeout, separate from any run deadline
//! - Only transport failures are retried; an HTTP response is a final answer
//! - Backoff is a trait so tests can observe and shorten delays

pub mod backoff;
pub mod retries;
