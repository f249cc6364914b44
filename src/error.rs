//! Setup errors. Any of these ends the process before probing starts.

use thiserror::Error;

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::input::InputError;
use crate::observability::logging::LoggingError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("cannot start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Render an error and its causes on one line. A cause whose text is already
/// part of the message so far is skipped.
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
