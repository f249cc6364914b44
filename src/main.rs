//! ollama-checker
//!
//! Probes a list of model servers concurrently and exports the healthy ones.
//!
//! # Architecture Overview
//!
//! ```text
//!   --file / args                                         healthy_endpoints.csv
//!        │                                                         ▲
//!        ▼                                                         │
//!   ┌─────────┐   ┌───────────┐   ┌──────────────┐   ┌────────────┐│
//!   │  input  │──▶│ job queue │──▶│ worker pool  │──▶│ aggregator │┘
//!   └─────────┘   └───────────┘   │  (N probers) │   └─────┬──────┘
//!                                 └──────┬───────┘         │
//!                                        │                 ▼
//!                              GET <endpoint>/api/tags   console report
//!
//!   Cross-cutting: config (TOML + flags), logging (tracing, per-run file),
//!   metrics, lifecycle (Ctrl+C, optional deadline)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ollama_checker::config::{load_config, validate_config, CheckerConfig, ConfigError};
use ollama_checker::export::CsvSink;
use ollama_checker::input::load_endpoints;
use ollama_checker::lifecycle::signals::spawn_ctrl_c_handler;
use ollama_checker::observability::{logging, metrics};
use ollama_checker::report::{print_summary, ConsoleProgress};
use ollama_checker::error;
use ollama_checker::{Checker, Error, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "ollama-checker", version)]
#[command(about = "Check which model servers answer /api/tags with a usable inventory", long_about = None)]
struct Cli {
    /// File with one endpoint per line ('#' starts a comment)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV export path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Abandon unclaimed endpoints after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Use a fixed number of workers instead of sizing from the workload
    #[arg(long)]
    workers: Option<usize>,

    /// Only count models that also report a digest
    #[arg(long)]
    strict: bool,

    /// Directory for run logs
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Endpoints to check when --file is not given
    urls: Vec<String>,
}

impl Cli {
    fn apply(&self, config: &mut CheckerConfig) {
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.output.log_dir = log_dir.clone();
        }
        if self.deadline.is_some() {
            config.run.deadline_secs = self.deadline;
        }
        if self.workers.is_some() {
            config.pool.fixed_workers = self.workers;
        }
        if self.strict {
            config.probe.require_digest = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", error::report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CheckerConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    let log = logging::init_logging(&config.observability, &config.output.log_dir)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        args = ?std::env::args().collect::<Vec<_>>(),
        log_file = %log.path().display(),
        "ollama-checker starting"
    );

    let endpoints = load_endpoints(cli.file.as_deref(), &cli.urls)?;
    let sink = CsvSink::create(&config.output.csv_path)?;

    if let Some(address) = &config.observability.metrics_address {
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| Error::MetricsAddress(address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let checker = Checker::new(config)?;
    let shutdown = Shutdown::new();
    let signals = spawn_ctrl_c_handler(shutdown.clone());

    let summary = checker.run(endpoints, Box::new(ConsoleProgress), &shutdown).await;
    signals.abort();

    let csv_path = sink.path().to_path_buf();
    sink.write(&summary.successful)?;
    print_summary(&summary, Some(&csv_path));

    drop(log);
    Ok(())
}
