//! Run summary and progress snapshots.

use crate::probe::ProbeResult;

/// Counts observed after each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub expected: usize,
}

/// Final outcome of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Endpoints handed to the run.
    pub requested: usize,
    /// Results received; equals `succeeded + failed`.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Healthy results in input order.
    pub successful: Vec<ProbeResult>,
    /// Whether a deadline or signal cut the run short.
    pub cancelled: bool,
}

impl RunSummary {
    /// Jobs never claimed because the run was cancelled.
    pub fn unprocessed(&self) -> usize {
        self.requested.saturating_sub(self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total == self.requested
    }
}
