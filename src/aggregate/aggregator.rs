//! Single consumer of the result channel.

use tokio::sync::mpsc;

use crate::aggregate::summary::{Progress, RunSummary};
use crate::pool::Completed;
use crate::probe::ProbeResult;

/// Hook called after every result; used for progress display.
pub trait ProgressObserver: Send {
    fn on_result(&mut self, result: &ProbeResult, progress: Progress);
}

impl ProgressObserver for () {
    fn on_result(&mut self, _result: &ProbeResult, _progress: Progress) {}
}

/// Builds a [`RunSummary`] from the result stream.
///
/// Owned by one task; its counters need no synchronisation.
pub struct Aggregator {
    expected: usize,
    succeeded: usize,
    failed: usize,
    successful: Vec<(usize, ProbeResult)>,
    observer: Box<dyn ProgressObserver>,
}

impl Aggregator {
    pub fn new(expected: usize, observer: Box<dyn ProgressObserver>) -> Self {
        Self {
            expected,
            succeeded: 0,
            failed: 0,
            successful: Vec::new(),
            observer,
        }
    }

    /// Drain `results` until every sender is dropped.
    pub async fn run(mut self, mut results: mpsc::Receiver<Completed>) -> Self {
        while let Some(completed) = results.recv().await {
            self.record(completed);
        }
        self
    }

    /// Account for one result and notify the observer.
    pub fn record(&mut self, completed: Completed) {
        let Completed { position, result } = completed;
        if result.healthy {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        let progress = self.progress();
        self.observer.on_result(&result, progress);

        if result.healthy {
            self.successful.push((position, result));
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            processed: self.succeeded + self.failed,
            succeeded: self.succeeded,
            failed: self.failed,
            expected: self.expected,
        }
    }

    /// Close the books. Healthy results are ordered by input position.
    pub fn finish(mut self, cancelled: bool) -> RunSummary {
        self.successful.sort_by_key(|(position, _)| *position);
        RunSummary {
            requested: self.expected,
            total: self.succeeded + self.failed,
            succeeded: self.succeeded,
            failed: self.failed,
            successful: self.successful.into_iter().map(|(_, r)| r).collect(),
            cancelled,
        }
    }
}
