//! pickqueue Core - domain model and ordering rules for a turn-taking queue
//!
//! This crate has no storage dependency. It provides:
//! - `Member` and `ActivityEntry` models
//! - Name normalization (title case, case-insensitive identity)
//! - Queue-shape classification and the pure reorder functions used by
//!   `next` and `defer`
//! - The `Clock` seam and timestamp encoding
//! - The error facility (`QueueError`, `ExError`) and logging facility

pub mod clock;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod names;
pub mod rotation;

#[doc(hidden)]
pub use pickqueue_core_types as core_types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ExError, ExErrorKind, QueueError, Result};
pub use model::{ActivityAction, ActivityEntry, HistoryLimit, Member};
pub use rotation::{DeferOutcome, QueueShape};
