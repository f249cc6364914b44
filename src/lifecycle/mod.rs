//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Init logging → Resolve endpoints → Run
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or deadline → Cancel token → Workers stop pulling → Drain → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger cancellation
//! ```
//!
//! # Design Decisions
//! - Setup errors are fatal and happen before any probe is sent
//! - Cancellation never aborts an in-flight request; it bounds the wait instead

pub mod shutdown;
pub mod signals;

pub use shutdown::{sleep_with_shutdown, Shutdown};
