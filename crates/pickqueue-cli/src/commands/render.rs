//! Plain-text rendering of engine results and errors

use chrono::{DateTime, Utc};
use pickqueue_core::errors::{ExError, ExErrorKind};
use pickqueue_core::{ActivityAction, ActivityEntry, DeferOutcome};
use pickqueue_engine::commands::engine_command::EngineCommandResult;
use pickqueue_engine::commands::read_tools::{GlobalStats, MemberStats, QueueEntry};

/// Leaderboard rows shown in queue-wide stats
const RANKED_SHOWN: usize = 5;

/// Details longer than this are left out of history lines
const MAX_DETAILS_SHOWN: usize = 50;

fn days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

fn date(ts: DateTime<Utc>) -> String {
    ts.format("%b %d, %Y").to_string()
}

pub fn command_result(result: &EngineCommandResult) -> String {
    match result {
        EngineCommandResult::MemberAdded { name, position } => {
            let mut text = format!("Added {} to the queue at position {}.", name, position);
            if *position == 1 {
                text.push_str(&format!("\n{} is now picking.", name));
            }
            text
        }
        EngineCommandResult::MemberRemoved {
            name,
            old_position,
            new_picker,
        } => {
            let mut text = format!(
                "Removed {} from the queue.\nAll members after position {} moved up one position.",
                name, old_position
            );
            if let Some(next) = new_picker {
                text.push_str(&format!("\n{} is now picking.", next));
            }
            text
        }
        EngineCommandResult::Advanced {
            finished,
            now_picking,
        } => format!(
            "{} has finished picking and moved to the end of the queue.\n{}, you're up next to pick!",
            finished, now_picking
        ),
        EngineCommandResult::SoleMemberCompleted { name } => format!(
            "{} has finished picking!\nSince they're the only member, they remain the current picker.",
            name
        ),
        EngineCommandResult::Deferred {
            deferred,
            now_picking,
            outcome,
        } => {
            let moved = match outcome {
                DeferOutcome::Swapped => "swapped positions with the other member",
                DeferOutcome::MovedToEnd => "moved to the end of the queue",
                DeferOutcome::MovedBackOne => "moved one position back in the queue",
            };
            format!(
                "{} has {}.\n{}, you're up next to pick!\n{} will get their turn again soon.",
                deferred, moved, now_picking, deferred
            )
        }
        EngineCommandResult::StartupRecorded { .. } => "Session started.".to_string(),
    }
}

pub fn queue_view(entries: &[QueueEntry]) -> String {
    if entries.is_empty() {
        return "The queue is currently empty.\nUse `add <name>` to add members!".to_string();
    }

    let mut lines = vec!["Queue:".to_string()];
    for entry in entries {
        if entry.is_current_picker {
            let mut line = format!("{}. {} (currently picking", entry.position, entry.name);
            if let Some(n) = entry.days_as_picker.filter(|n| *n > 0) {
                line.push_str(&format!(" - {}", days(n)));
            }
            line.push(')');
            lines.push(line);
        } else {
            lines.push(format!("{}. {}", entry.position, entry.name));
        }
    }
    lines.push(format!("Total members: {}", entries.len()));
    lines.join("\n")
}

pub fn member_stats(stats: &MemberStats) -> String {
    let picking = match (stats.is_current_picker, stats.days_as_picker) {
        (true, Some(n)) => format!("Yes ({})", days(n)),
        (true, None) => "Yes".to_string(),
        (false, _) => "No".to_string(),
    };
    [
        format!("Stats for {}", stats.name),
        format!("  Current position: #{}", stats.position),
        format!("  Picks: {}", stats.pick_count),
        format!("  Joined: {}", date(stats.join_date)),
        format!(
            "  Last pick: {}",
            stats.last_pick_date.map(date).unwrap_or_else(|| "Never".into())
        ),
        format!("  Currently picking: {}", picking),
    ]
    .join("\n")
}

pub fn global_stats(stats: &GlobalStats) -> String {
    if stats.member_count == 0 {
        return "No statistics available - the queue is empty!".to_string();
    }

    let mut lines = vec![
        "Queue statistics".to_string(),
        format!("  Total members: {}", stats.member_count),
        format!(
            "  Picks in {}: {} ({} advanced, {} solo)",
            stats.year, stats.picks_this_year, stats.advances_this_year, stats.completions_this_year
        ),
    ];

    if let Some(picker) = &stats.current_picker {
        let mut line = format!("  Currently picking: {}", picker.name);
        if let Some(n) = picker.days_as_picker {
            line.push_str(&format!(" ({})", days(n)));
        }
        lines.push(line);
    }

    lines.push("  Member pick history:".to_string());
    for member in stats.ranked.iter().take(RANKED_SHOWN) {
        let last = match member.last_pick_date {
            Some(ts) => format!("last: {}", ts.format("%b %d")),
            None => "never picked".to_string(),
        };
        lines.push(format!(
            "    {}. {}: {} picks ({})",
            member.rank, member.name, member.pick_count, last
        ));
    }
    lines.join("\n")
}

fn describe(entry: &ActivityEntry) -> String {
    let who = entry.member_name.as_deref().unwrap_or("System");
    match entry.action {
        ActivityAction::MemberAdded => format!("Added {}", who),
        ActivityAction::MemberRemoved => format!("Removed {}", who),
        ActivityAction::QueueAdvanced => format!("{} finished picking", who),
        ActivityAction::PickCompleted => format!("{} finished picking (only member)", who),
        ActivityAction::PickerDeferred => format!("{} deferred their turn", who),
        ActivityAction::BotStartup => "Session started".to_string(),
    }
}

pub fn history(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return "No activity recorded yet.".to_string();
    }

    let mut lines = vec!["Recent activity:".to_string()];
    for entry in entries {
        lines.push(format!(
            "{} - {}",
            entry.timestamp.format("%b %d, %I:%M %p"),
            describe(entry)
        ));
        if let Some(details) = entry
            .details
            .as_deref()
            .filter(|d| d.len() < MAX_DETAILS_SHOWN)
        {
            lines.push(format!("   > {}", details));
        }
    }
    lines.push(format!("Showing last {} activities", entries.len()));
    lines.join("\n")
}

/// User-facing text for an engine error
pub fn error(e: &ExError) -> String {
    let member = e.member().unwrap_or("that member");
    match e.kind() {
        ExErrorKind::DuplicateMember => format!("{} is already in the queue.", member),
        ExErrorKind::MemberNotFound => format!("I couldn't find {} in the queue.", member),
        ExErrorKind::InvalidName => "Please provide a member name.".to_string(),
        ExErrorKind::EmptyQueue => {
            "The queue is empty! Add members with `add <name>` first.".to_string()
        }
        ExErrorKind::CannotDefer => "Cannot defer when there's only one member in the queue.\n\
             Add more members first, or use `next` if the current picker has finished."
            .to_string(),
        ExErrorKind::NotCurrentPicker => {
            let mut text = format!("{} is not the current picker.", member);
            if let Some(position) = e.position() {
                text.push_str(&format!(" {} is at position {}.", member, position));
            }
            text.push_str(&format!(
                "\nOnly {} (the current picker) can defer their turn.",
                e.current_picker().unwrap_or("the current picker")
            ));
            text
        }
        ExErrorKind::InvalidLimit => "History limit must be between 1 and 50.".to_string(),
        ExErrorKind::CorruptQueue => format!(
            "The queue data is inconsistent ({}). No changes were made.",
            e.message()
        ),
        ExErrorKind::StorageFailure | ExErrorKind::Io => {
            "Something went wrong reaching the queue database. Please try again.".to_string()
        }
        ExErrorKind::Internal => {
            "An unexpected error occurred. Please try again later.".to_string()
        }
    }
}
