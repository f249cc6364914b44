//! Endpoint probing.
//!
//! # Data Flow
//! ```text
//! endpoint
//!     → prober.rs (build URL, send GET, retry transport failures)
//!     → inventory.rs (decode body, apply validity rules)
//!     → types.rs (ProbeResult handed to the worker)
//! ```
//!
//! # Design Decisions
//! - A probe never returns an error; failure is a field of the result
//! - Non-200 responses are final, transport failures are retried
//! - Bodies are always drained

pub mod inventory;
pub mod prober;
pub mod types;

pub use prober::{HttpProber, Probe};
pub use types::{ProbeError, ProbeResult};
