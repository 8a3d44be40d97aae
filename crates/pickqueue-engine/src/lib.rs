//! pickqueue Engine - orchestration layer
//!
//! Every mutation runs as one immediate SQLite transaction that reorders
//! members and appends its activity entry together. Reads run against a
//! single consistent snapshot.

pub mod commands;
