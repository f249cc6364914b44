//! Run orchestration.
//!
//! # Responsibilities
//! - Size the pool from the task count
//! - Create the job queue and result channel, both sized to the task count
//! - Start workers, feed and close the queue, drain results
//! - Enforce the optional run deadline

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregate::{Aggregator, ProgressObserver, RunSummary};
use crate::config::CheckerConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::pool::{job_queue, strategy_from_config, Job, PoolConfig, SizingStrategy, WorkerPool};
use crate::probe::{HttpProber, Probe};

/// Checks a list of endpoints with a bounded worker pool.
pub struct Checker {
    config: CheckerConfig,
    prober: Arc<dyn Probe>,
    sizing: Box<dyn SizingStrategy>,
}

impl Checker {
    /// Create a checker probing over HTTP.
    pub fn new(config: CheckerConfig) -> Result<Self, reqwest::Error> {
        let prober = HttpProber::new(config.probe.clone(), &config.retries)?;
        Ok(Self::with_prober(config, Arc::new(prober)))
    }

    /// Create a checker around any prober.
    pub fn with_prober(config: CheckerConfig, prober: Arc<dyn Probe>) -> Self {
        let sizing = strategy_from_config(&config);
        Self {
            config,
            prober,
            sizing,
        }
    }

    /// Replace the worker count policy.
    pub fn with_sizing(mut self, sizing: Box<dyn SizingStrategy>) -> Self {
        self.sizing = sizing;
        self
    }

    /// Pool parameters for `task_count` endpoints.
    pub fn pool_config(&self, task_count: usize) -> PoolConfig {
        PoolConfig::resolve(&self.config, self.sizing.as_ref(), task_count)
    }

    /// Probe every endpoint once and summarise.
    ///
    /// Returns early, with unclaimed jobs left unprocessed, if `shutdown` is
    /// triggered or the configured deadline passes.
    pub async fn run(
        &self,
        endpoints: Vec<String>,
        observer: Box<dyn ProgressObserver>,
        shutdown: &Shutdown,
    ) -> RunSummary {
        let run_id = Uuid::new_v4();
        self.run_inner(endpoints, observer, shutdown)
            .instrument(tracing::info_span!("run", run_id = %run_id))
            .await
    }

    async fn run_inner(
        &self,
        endpoints: Vec<String>,
        observer: Box<dyn ProgressObserver>,
        shutdown: &Shutdown,
    ) -> RunSummary {
        let requested = endpoints.len();
        let pool = self.pool_config(requested);

        tracing::info!(
            tasks = requested,
            workers = pool.worker_count,
            request_timeout = ?pool.per_request_timeout,
            max_retries = pool.max_retries,
            backoff_unit = ?pool.retry_backoff_unit,
            deadline = ?self.config.run.deadline(),
            "Starting run"
        );
        metrics::record_workers(pool.worker_count);

        let cancel = shutdown.subscribe();
        let deadline = self.config.run.deadline().map(|d| shutdown.trigger_after(d));

        let (jobs, queue) = job_queue(requested);
        let (results_tx, results_rx) = mpsc::channel(requested.max(1));
        let workers = WorkerPool::spawn(
            pool.worker_count,
            queue.clone(),
            self.prober.clone(),
            results_tx,
            cancel.clone(),
        );

        let produce = async {
            for (position, endpoint) in endpoints.into_iter().enumerate() {
                if !jobs.push(Job { position, endpoint }).await {
                    break;
                }
            }
            jobs.close();
            workers.join().await
        };
        let consume = Aggregator::new(requested, observer).run(results_rx);

        // The result channel closes when the last worker drops its sender.
        let (processed, aggregator) = tokio::join!(produce, consume);

        if let Some(timer) = deadline {
            timer.abort();
        }
        // A cancel that lands after the last result leaves nothing unprocessed.
        let cancelled = cancel.is_cancelled() && aggregator.progress().processed < requested;
        let summary = aggregator.finish(cancelled);

        if cancelled {
            tracing::warn!(
                processed,
                unclaimed = queue.remaining().await,
                "Run cancelled before all jobs were claimed"
            );
        }
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            unprocessed = summary.unprocessed(),
            "Run complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Progress;
    use crate::pool::FixedSizing;
    use crate::probe::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Healthy for endpoints containing "ok", counts every call.
    #[derive(Default)]
    struct ScriptedProber {
        calls: Mutex<HashMap<String, usize>>,
        delay: Duration,
    }

    #[async_trait]
    impl Probe for ScriptedProber {
        async fn probe(&self, endpoint: &str, _cancel: &CancellationToken) -> ProbeResult {
            *self.calls.lock().unwrap().entry(endpoint.to_string()).or_default() += 1;
            tokio::time::sleep(self.delay).await;
            if endpoint.contains("ok") {
                ProbeResult::healthy(endpoint, vec!["llama3".into()], 0)
            } else {
                ProbeResult::unhealthy(endpoint, ProbeError::NoModels, 0)
            }
        }
    }

    fn endpoints(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| if i % 3 == 0 { format!("http://bad-{}", i) } else { format!("http://ok-{}", i) })
            .collect()
    }

    #[tokio::test]
    async fn test_every_endpoint_lands_in_one_bucket() {
        let prober = Arc::new(ScriptedProber::default());
        let checker = Checker::with_prober(CheckerConfig::default(), prober.clone());

        let input = endpoints(50);
        let summary = checker.run(input.clone(), Box::new(()), &Shutdown::new()).await;

        assert_eq!(summary.requested, 50);
        assert_eq!(summary.total, 50);
        assert_eq!(summary.succeeded + summary.failed, 50);
        assert_eq!(summary.failed, 17);
        assert!(!summary.cancelled);

        let calls = prober.calls.lock().unwrap();
        assert_eq!(calls.len(), 50);
        assert!(calls.values().all(|&c| c == 1), "an endpoint was dispatched twice");

        let healthy: Vec<_> = summary.successful.iter().map(|r| r.endpoint.clone()).collect();
        let expected: Vec<_> = input.into_iter().filter(|e| e.contains("ok")).collect();
        assert_eq!(healthy, expected);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let checker = Checker::with_prober(CheckerConfig::default(), Arc::new(ScriptedProber::default()));
        let summary = checker.run(Vec::new(), Box::new(()), &Shutdown::new()).await;
        assert_eq!(summary.total, 0);
        assert!(summary.successful.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_leaves_jobs_unclaimed() {
        let mut config = CheckerConfig::default();
        config.run.deadline_secs = Some(1);
        let prober = Arc::new(ScriptedProber {
            delay: Duration::from_millis(400),
            ..Default::default()
        });
        let checker = Checker::with_prober(config, prober).with_sizing(Box::new(FixedSizing(2)));

        let started = std::time::Instant::now();
        let summary = checker.run(endpoints(40), Box::new(()), &Shutdown::new()).await;

        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(summary.cancelled);
        assert!(summary.total < 40);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(summary.unprocessed(), 40 - summary.total);
    }

    /// Triggers shutdown from inside the aggregator once every result is in.
    struct CancelOnLast(Shutdown);

    impl ProgressObserver for CancelOnLast {
        fn on_result(&mut self, _result: &ProbeResult, progress: Progress) {
            if progress.processed == progress.expected {
                self.0.trigger();
            }
        }
    }

    #[tokio::test]
    async fn test_cancel_after_last_result_is_not_a_cancelled_run() {
        let checker = Checker::with_prober(CheckerConfig::default(), Arc::new(ScriptedProber::default()));
        let shutdown = Shutdown::new();

        let summary = checker
            .run(endpoints(6), Box::new(CancelOnLast(shutdown.clone())), &shutdown)
            .await;

        assert!(shutdown.is_triggered());
        assert!(!summary.cancelled);
        assert!(summary.is_complete());
        assert_eq!(summary.unprocessed(), 0);
    }

    #[test]
    fn test_pool_config_uses_strategy() {
        let checker = Checker::with_prober(CheckerConfig::default(), Arc::new(ScriptedProber::default()));
        assert_eq!(checker.pool_config(100).worker_count, 20);
        let checker = checker.with_sizing(Box::new(|n: usize| n + 1));
        assert_eq!(checker.pool_config(4).worker_count, 5);
    }
}
