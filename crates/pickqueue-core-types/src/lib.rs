//! Core types shared across pickqueue facilities
//!
//! - **Correlation types**: RequestId, attached to every engine operation
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
