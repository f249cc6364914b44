//! End-to-end runs against mock backends.

use std::time::{Duration, Instant};

use ollama_checker::config::CheckerConfig;
use ollama_checker::export::write_csv;
use ollama_checker::lifecycle::Shutdown;
use ollama_checker::pool::FixedSizing;
use ollama_checker::Checker;

mod common;
use common::{endpoint, Reply};

fn fast_config() -> CheckerConfig {
    let mut config = CheckerConfig::default();
    config.probe.timeout_ms = 1_000;
    config.probe.connect_timeout_ms = 1_000;
    config.retries.max_retries = 1;
    config.retries.backoff_unit_ms = 10;
    config
}

#[tokio::test]
async fn test_mixed_fleet() {
    let healthy_a = common::start_mock_backend(common::LLAMA3).await;
    let broken = common::start_programmable_backend(|_| async { Reply::Respond(503, "down".into()) }).await;
    let empty = common::start_mock_backend(common::EMPTY).await;
    let healthy_b = common::start_mock_backend(r#"{"models":[{"name":"qwen2"},{"name":"phi3"}]}"#).await;
    let refused = common::refused_addr().await;

    let input = vec![
        endpoint(healthy_a),
        endpoint(broken),
        endpoint(empty),
        endpoint(healthy_b),
        endpoint(refused),
    ];

    let checker = Checker::new(fast_config()).unwrap();
    let summary = checker.run(input.clone(), Box::new(()), &Shutdown::new()).await;

    assert_eq!(summary.requested, 5);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 3);
    assert!(!summary.cancelled);

    let healthy: Vec<_> = summary.successful.iter().map(|r| r.endpoint.as_str()).collect();
    assert_eq!(healthy, vec![input[0].as_str(), input[3].as_str()]);

    let mut csv = Vec::new();
    write_csv(&mut csv, &summary.successful).unwrap();
    let expected = format!("URL,Model\n{},llama3\n{},qwen2; phi3\n", input[0], input[3]);
    assert_eq!(String::from_utf8(csv).unwrap(), expected);
}

#[tokio::test]
async fn test_load_performance() {
    let backend = common::start_mock_backend(common::LLAMA3).await;
    let input = vec![endpoint(backend); 200];

    let checker = Checker::new(fast_config()).unwrap();
    assert_eq!(checker.pool_config(input.len()).worker_count, 20);

    let start = Instant::now();
    let summary = checker.run(input, Box::new(()), &Shutdown::new()).await;
    let elapsed = start.elapsed();

    println!("200 probes in {:?}", elapsed);
    assert_eq!(summary.total, 200);
    assert_eq!(summary.succeeded + summary.failed, 200);
    assert!(elapsed < Duration::from_secs(30));
}

#[tokio::test]
async fn test_cancel_mid_flight() {
    let mut input = Vec::new();
    for _ in 0..10 {
        let addr = common::start_programmable_backend(|_| async { Reply::Hang(Duration::from_secs(30)) }).await;
        input.push(endpoint(addr));
    }

    let checker = Checker::new(fast_config()).unwrap().with_sizing(Box::new(FixedSizing(2)));
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.trigger();
    });

    let started = Instant::now();
    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        checker.run(input, Box::new(()), &shutdown),
    )
    .await
    .expect("run should end within the grace period");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(summary.cancelled);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.unprocessed(), 8);
}

#[tokio::test]
async fn test_deadline_cancels_run() {
    let mut input = Vec::new();
    for _ in 0..6 {
        let addr = common::start_programmable_backend(|_| async { Reply::Hang(Duration::from_secs(30)) }).await;
        input.push(endpoint(addr));
    }

    let mut config = fast_config();
    config.run.deadline_secs = Some(1);
    config.probe.timeout_ms = 3_000;
    config.retries.backoff_unit_ms = 5_000;
    config.pool.fixed_workers = Some(1);

    let checker = Checker::new(config).unwrap();
    let summary = checker.run(input, Box::new(()), &Shutdown::new()).await;

    assert!(summary.cancelled);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.unprocessed(), 5);
    assert_eq!(summary.failed, 1);
    assert!(summary.successful.is_empty());
}
