//! Result types for the read-only query surface.
//!
//! Plain data containers, built from one consistent read of the store.

use chrono::{DateTime, Utc};

/// One row of the queue view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub position: u32,
    pub name: String,
    pub is_current_picker: bool,
    /// Whole days since this member became holder; `None` without a stamp
    pub days_as_picker: Option<i64>,
}

/// Stats for a single member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStats {
    pub name: String,
    pub position: u32,
    pub pick_count: u32,
    pub join_date: DateTime<Utc>,
    /// `None` renders as "never"
    pub last_pick_date: Option<DateTime<Utc>>,
    pub is_current_picker: bool,
    pub days_as_picker: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerSummary {
    pub name: String,
    pub days_as_picker: Option<i64>,
}

/// A member's place in the pick leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMember {
    /// 1-based
    pub rank: usize,
    pub name: String,
    pub pick_count: u32,
    pub last_pick_date: Option<DateTime<Utc>>,
}

/// Queue-wide stats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStats {
    pub member_count: u32,
    /// Calendar year (UTC) the yearly counts cover
    pub year: i32,
    /// `QUEUE_ADVANCED` entries this year
    pub advances_this_year: u32,
    /// `PICK_COMPLETED` entries this year (sole-member turns)
    pub completions_this_year: u32,
    /// `advances_this_year + completions_this_year`
    pub picks_this_year: u32,
    pub current_picker: Option<PickerSummary>,
    pub ranked: Vec<RankedMember>,
}
