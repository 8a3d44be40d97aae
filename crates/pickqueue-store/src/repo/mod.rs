//! Repository layer over the queue database

pub mod activity;
pub mod members;

pub use activity::ActivityRepo;
pub use members::MemberRepo;
