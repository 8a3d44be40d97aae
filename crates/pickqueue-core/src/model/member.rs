use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A participant in the rotation
///
/// `position` is 1-based and dense across the queue. The member at position
/// 1 is the current holder; there is no separate "holder" flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Opaque identifier (UUID v7), fixed at creation
    pub id: String,

    /// Display name in title case; unique ignoring case
    pub name: String,

    /// Slot in the rotation, 1..=N
    pub position: u32,

    /// When the member was added
    pub join_date: DateTime<Utc>,

    /// Completed turns; only `next` increments this
    pub pick_count: u32,

    /// When the member last completed a turn
    pub last_pick_date: Option<DateTime<Utc>>,

    /// When the member became holder; `None` unless at position 1
    pub current_picker_since: Option<DateTime<Utc>>,
}

impl Member {
    /// Create a member that has never picked
    pub fn new(id: String, name: String, position: u32, join_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            position,
            join_date,
            pick_count: 0,
            last_pick_date: None,
            current_picker_since: None,
        }
    }

    /// Whether this member currently holds the turn
    pub fn is_current_picker(&self) -> bool {
        self.position == 1
    }

    /// Whole days spent as holder, if a stamp is present
    pub fn days_as_picker(&self, now: DateTime<Utc>) -> Option<i64> {
        self.current_picker_since
            .map(|since| crate::clock::days_between(since, now))
    }
}
