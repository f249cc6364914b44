//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and returns every
//! problem found rather than stopping at the first.

use thiserror::Error;

use crate::config::schema::CheckerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("pool.min_workers ({min}) exceeds pool.max_workers ({max})")]
    WorkerRange { min: usize, max: usize },

    #[error("probe.path must start with '/', got '{0}'")]
    Path(String),

    #[error("retries.jitter_ratio must be within [0, 1], got {0}")]
    Jitter(String),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &CheckerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "probe.timeout_ms" });
    }
    if config.probe.connect_timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "probe.connect_timeout_ms" });
    }
    if !config.probe.path.starts_with('/') {
        errors.push(ValidationError::Path(config.probe.path.clone()));
    }

    let jitter = config.retries.jitter_ratio;
    if !(0.0..=1.0).contains(&jitter) {
        errors.push(ValidationError::Jitter(jitter.to_string()));
    }

    let pool = &config.pool;
    if pool.min_workers == 0 {
        errors.push(ValidationError::Zero { field: "pool.min_workers" });
    }
    if pool.min_workers > pool.max_workers {
        errors.push(ValidationError::WorkerRange {
            min: pool.min_workers,
            max: pool.max_workers,
        });
    }
    if pool.fixed_workers == Some(0) {
        errors.push(ValidationError::Zero { field: "pool.fixed_workers" });
    }
    if config.run.deadline_secs == Some(0) {
        errors.push(ValidationError::Zero { field: "run.deadline_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CheckerConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = CheckerConfig::default();
        config.probe.timeout_ms = 0;
        config.probe.path = "api/tags".into();
        config.pool.min_workers = 30;
        config.retries.jitter_ratio = 1.5;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "probe.timeout_ms" }));
        assert!(errors.contains(&ValidationError::WorkerRange { min: 30, max: 20 }));
    }
}
