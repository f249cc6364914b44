//! Worker pool subsystem.
//!
//! # Data Flow
//! ```text
//! task count
//!     → sizer.rs (SizingStrategy picks worker_count)
//!     → PoolConfig (fixed for the whole run)
//!
//! queue.rs (jobs) → worker.rs (N tasks, Probe::probe) → result channel
//! ```
//!
//! # Design Decisions
//! - Workers share nothing but the job queue and the result sender
//! - Cancellation is checked before every job pull, never mid-request
//! - No ordering across workers; each job yields exactly one result

pub mod queue;
pub mod sizer;
pub mod worker;

use std::time::Duration;

use crate::config::CheckerConfig;

pub use queue::{job_queue, Job, JobQueue, JobSender};
pub use sizer::{size_workers, DynamicSizing, FixedSizing, SizingStrategy};
pub use worker::{Completed, WorkerPool};

/// Resolved pool parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub worker_count: usize,
    pub per_request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff_unit: Duration,
}

impl PoolConfig {
    /// Compute the pool for `task_count` jobs before any worker starts.
    pub fn resolve(config: &CheckerConfig, strategy: &dyn SizingStrategy, task_count: usize) -> Self {
        Self {
            worker_count: strategy.workers_for(task_count),
            per_request_timeout: config.probe.timeout(),
            max_retries: config.retries.max_retries,
            retry_backoff_unit: config.retries.backoff_unit(),
        }
    }
}

/// The sizing strategy selected by configuration.
pub fn strategy_from_config(config: &CheckerConfig) -> Box<dyn SizingStrategy> {
    match config.pool.fixed_workers {
        Some(n) => Box::new(FixedSizing(n)),
        None => Box::new(DynamicSizing {
            min: config.pool.min_workers,
            max: config.pool.max_workers,
        }),
    }
}
