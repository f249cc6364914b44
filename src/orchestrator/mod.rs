//! Run orchestration.
//!
//! # Data Flow
//! ```text
//! endpoints
//!     → job queue (capacity = task count)
//!     → WorkerPool (worker_count from the sizing strategy)
//!     → result channel (capacity = task count)
//!     → Aggregator
//!     → RunSummary
//! ```
//!
//! # Design Decisions
//! - Producer and consumer run concurrently on the orchestrating task
//! - The deadline cancels the shared token; it never aborts a request
//! - Per-endpoint failures never fail the run

pub mod checker;

pub use checker::Checker;
