use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QueueError;

/// The fixed set of actions recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    MemberAdded,
    MemberRemoved,
    QueueAdvanced,
    PickerDeferred,
    PickCompleted,
    BotStartup,
}

impl ActivityAction {
    pub const ALL: [ActivityAction; 6] = [
        ActivityAction::MemberAdded,
        ActivityAction::MemberRemoved,
        ActivityAction::QueueAdvanced,
        ActivityAction::PickerDeferred,
        ActivityAction::PickCompleted,
        ActivityAction::BotStartup,
    ];

    /// Stored column value
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::MemberAdded => "MEMBER_ADDED",
            ActivityAction::MemberRemoved => "MEMBER_REMOVED",
            ActivityAction::QueueAdvanced => "QUEUE_ADVANCED",
            ActivityAction::PickerDeferred => "PICKER_DEFERRED",
            ActivityAction::PickCompleted => "PICK_COMPLETED",
            ActivityAction::BotStartup => "BOT_STARTUP",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| QueueError::Storage {
                message: format!("unknown activity action {:?}", s),
            })
    }
}

/// One append-only activity log row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Auto-increment id; breaks timestamp ties
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub action: ActivityAction,
    pub member_name: Option<String>,
    pub details: Option<String>,
}
