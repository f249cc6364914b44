//! Probe outcome types.

use thiserror::Error;

/// Why an endpoint was classified unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The endpoint could not be turned into a request URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Connect, DNS, timeout or body read failure, after retries.
    #[error("{0}")]
    Transport(String),

    /// A response arrived with a status other than 200.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The 200 body was not an inventory document.
    #[error("invalid response format: {0}")]
    InvalidFormat(String),

    /// The inventory was empty.
    #[error("no available models")]
    NoModels,

    /// The inventory had entries but none usable.
    #[error("no valid models")]
    NoValidModels,

    /// The run was cancelled while this probe waited to retry.
    #[error("cancelled")]
    Cancelled,
}

impl ProbeError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::InvalidEndpoint(_) => "invalid_endpoint",
            ProbeError::Transport(_) => "transport",
            ProbeError::Status { .. } => "status",
            ProbeError::InvalidFormat(_) => "invalid_format",
            ProbeError::NoModels => "no_models",
            ProbeError::NoValidModels => "no_valid_models",
            ProbeError::Cancelled => "cancelled",
        }
    }
}

/// Classified outcome of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub endpoint: String,
    pub healthy: bool,
    pub error: Option<ProbeError>,
    /// Valid model names, in response order.
    pub models: Vec<String>,
    /// Retry delays taken before the final attempt.
    pub retries: u32,
}

impl ProbeResult {
    pub fn healthy(endpoint: impl Into<String>, models: Vec<String>, retries: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            healthy: true,
            error: None,
            models,
            retries,
        }
    }

    pub fn unhealthy(endpoint: impl Into<String>, error: ProbeError, retries: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            healthy: false,
            error: Some(error),
            models: Vec::new(),
            retries,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}
