//! Terminal progress and summary output.

use std::io::{self, Write};
use std::path::Path;

use crate::aggregate::{Progress, ProgressObserver, RunSummary};
use crate::probe::ProbeResult;

const CLEAR_LINE: &str = "\x1b[2K\r";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Prints each healthy endpoint and keeps a running counter on the last line.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_result(&mut self, result: &ProbeResult, progress: Progress) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{}", CLEAR_LINE);
        if result.healthy {
            let _ = writeln!(out, "{}✓{} {} ({})", GREEN, RESET, result.endpoint, result.models.join(", "));
        }
        let _ = write!(out, "{}", progress_line(&progress));
        let _ = out.flush();
    }
}

pub fn progress_line(progress: &Progress) -> String {
    format!(
        "{}processed: {}/{} | failed: {}{}",
        YELLOW, progress.processed, progress.expected, progress.failed, RESET
    )
}

/// Final console report.
pub fn print_summary(summary: &RunSummary, csv_path: Option<&Path>) {
    println!();
    println!("Check complete");
    println!("  endpoints: {}", summary.requested);
    println!("  healthy:   {}", summary.succeeded);
    println!("  unhealthy: {}", summary.failed);
    if summary.cancelled {
        println!("  skipped:   {} (run cancelled)", summary.unprocessed());
    }
    if let Some(path) = csv_path {
        println!("  export:    {}", path.display());
    }
}
