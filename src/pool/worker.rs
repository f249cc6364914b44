//! Worker tasks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::pool::queue::JobQueue;
use crate::probe::{Probe, ProbeResult};

/// A probe result tagged with the input position of its endpoint.
#[derive(Debug, Clone)]
pub struct Completed {
    pub position: usize,
    pub result: ProbeResult,
}

/// Fixed set of workers draining one job queue.
pub struct WorkerPool {
    workers: JoinSet<usize>,
}

impl WorkerPool {
    /// Spawn `count` workers. Each owns a clone of `results`; the channel
    /// closes when the last worker exits.
    pub fn spawn(
        count: usize,
        queue: JobQueue,
        prober: Arc<dyn Probe>,
        results: mpsc::Sender<Completed>,
        cancel: CancellationToken,
    ) -> Self {
        let mut workers = JoinSet::new();
        for id in 0..count {
            workers.spawn(run_worker(
                id,
                queue.clone(),
                prober.clone(),
                results.clone(),
                cancel.clone(),
            ));
        }
        Self { workers }
    }

    /// Wait for every worker to exit. Returns the number of jobs processed.
    pub async fn join(mut self) -> usize {
        let mut processed = 0;
        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(count) => processed += count,
                Err(e) => tracing::error!(error = %e, "Worker task failed"),
            }
        }
        processed
    }
}

/// Pull jobs until the queue is drained or the run is cancelled.
async fn run_worker(
    id: usize,
    queue: JobQueue,
    prober: Arc<dyn Probe>,
    results: mpsc::Sender<Completed>,
    cancel: CancellationToken,
) -> usize {
    let mut processed = 0;

    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(worker = id, "Worker observed cancellation");
                break;
            }
            job = queue.next() => job,
        };
        let Some(job) = job else { break };

        let result = prober.probe(&job.endpoint, &cancel).await;
        processed += 1;

        let completed = Completed {
            position: job.position,
            result,
        };
        if results.send(completed).await.is_err() {
            tracing::warn!(worker = id, "Result channel closed, worker exiting");
            break;
        }
    }

    tracing::debug!(worker = id, processed, "Worker finished");
    processed
}
