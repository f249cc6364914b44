//! Shared job queue.
//!
//! A bounded tokio channel with the receiving half shared by every worker.
//! The receiver lock is held only for one `recv`, so each job is claimed by
//! exactly one worker.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

/// One endpoint to probe, tagged with its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub position: usize,
    pub endpoint: String,
}

/// Producer half, owned by the orchestrator. Dropping it closes the queue.
#[derive(Debug)]
pub struct JobSender {
    tx: mpsc::Sender<Job>,
}

/// Consumer half, cloned into each worker.
#[derive(Debug, Clone)]
pub struct JobQueue {
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
}

/// Create a queue holding up to `capacity` jobs without blocking the sender.
pub fn job_queue(capacity: usize) -> (JobSender, JobQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        JobSender { tx },
        JobQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl JobSender {
    /// Enqueue a job. Returns false once every worker has gone away.
    pub async fn push(&self, job: Job) -> bool {
        self.tx.send(job).await.is_ok()
    }

    /// Close the queue; workers drain what is left, then stop.
    pub fn close(self) {}
}

impl JobQueue {
    /// Claim the next job, or `None` once the queue is closed and empty.
    pub async fn next(&self) -> Option<Job> {
        self.rx.lock().await.recv().await
    }

    /// Jobs still waiting to be claimed.
    pub async fn remaining(&self) -> usize {
        self.rx.lock().await.len()
    }
}
