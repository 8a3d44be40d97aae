//! pickqueue Store - SQLite persistence for the queue
//!
//! Provides:
//! - Connection management (WAL, busy timeout, foreign keys)
//! - Embedded migrations with checksums
//! - The Member Store (`repo::MemberRepo`) and Activity Log (`repo::ActivityRepo`)

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{ActivityRepo, MemberRepo};
