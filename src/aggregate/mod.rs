//! Result aggregation.
//!
//! # Data Flow
//! ```text
//! result channel (many workers → one receiver)
//!     → aggregator.rs (count, keep healthy results, notify observer)
//!     → summary.rs (RunSummary once the channel is closed)
//! ```
//!
//! # Design Decisions
//! - Exactly one consumer, so the counters are plain integers
//! - The failure counter lives here and nowhere else
//! - Progress reporting is a hook, not part of the result

pub mod aggregator;
pub mod summary;

pub use aggregator::{Aggregator, ProgressObserver};
pub use summary::{Progress, RunSummary};
