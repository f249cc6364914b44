//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides applied in main
//!     → CheckerConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the checker runs without a config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::CheckerConfig;
pub use schema::{ObservabilityConfig, OutputConfig, PoolSizingConfig, ProbeConfig, RetryConfig, RunConfig};
pub use validation::{validate_config, ValidationError};
