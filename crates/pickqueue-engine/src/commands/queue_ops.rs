//! Queue mutations
//!
//! Each function opens one `IMMEDIATE` transaction, so the write lock is
//! taken before the queue is read. Any `?` return drops the transaction
//! uncommitted and the store is left exactly as it was.

#![allow(clippy::result_large_err)]

use pickqueue_core::errors::ExError;
use pickqueue_core::names::{normalize_name, same_member};
use pickqueue_core::rotation::{defer_order, positions, rotate_to_back};
use pickqueue_core::{ActivityAction, Clock, DeferOutcome, Member, QueueError, QueueShape};
use pickqueue_store::errors::{from_rusqlite, Result};
use pickqueue_store::{ActivityRepo, MemberRepo};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::commands::engine_command::RemovalHandoff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMemberResult {
    pub name: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMemberResult {
    pub name: String,
    pub old_position: u32,
    /// Set when the removed member was holder and someone moved up
    pub new_picker: Option<String>,
}

/// What `next` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The holder moved to the end
    Advanced { finished: String, now_picking: String },
    /// Only one member: the turn completed in place
    SoleMemberCompleted { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferResult {
    pub deferred: String,
    pub now_picking: String,
    pub outcome: DeferOutcome,
}

fn begin(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)
}

fn ids_of(members: &[Member]) -> Vec<String> {
    members.iter().map(|m| m.id.clone()).collect()
}

fn name_of(members: &[Member], id: &str) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.clone())
        .unwrap_or_default()
}

/// Append a member; the first member of an empty queue becomes holder.
///
/// # Errors
///
/// `InvalidName`, `DuplicateMember`, or `StorageFailure`.
pub fn add_member(
    conn: &mut Connection,
    raw_name: &str,
    clock: &dyn Clock,
) -> Result<AddMemberResult> {
    let tx = begin(conn)?;
    let now = clock.now();

    let member = MemberRepo::add(&tx, raw_name, now)?;
    if member.position == 1 {
        MemberRepo::set_picker_since(&tx, &member.id, Some(now))?;
    }

    ActivityRepo::append(
        &tx,
        now,
        ActivityAction::MemberAdded,
        Some(&member.name),
        Some(&format!("Added at position {}", member.position)),
    )?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(AddMemberResult {
        name: member.name,
        position: member.position,
    })
}

/// Remove a member and close the gap.
///
/// When the holder leaves, `handoff` decides whether the member moving into
/// position 1 is stamped.
///
/// # Errors
///
/// `MemberNotFound`, `InvalidName`, or `StorageFailure`.
pub fn remove_member(
    conn: &mut Connection,
    raw_name: &str,
    clock: &dyn Clock,
    handoff: RemovalHandoff,
) -> Result<RemoveMemberResult> {
    let tx = begin(conn)?;
    let now = clock.now();

    let removed = MemberRepo::remove_by_name(&tx, raw_name)?;

    let mut new_picker = None;
    if removed.position == 1 {
        if let Some(successor) = MemberRepo::current_picker(&tx)? {
            if handoff == RemovalHandoff::StampSuccessor {
                MemberRepo::set_picker_since(&tx, &successor.id, Some(now))?;
            }
            new_picker = Some(successor.name);
        }
    }

    ActivityRepo::append(
        &tx,
        now,
        ActivityAction::MemberRemoved,
        Some(&removed.name),
        Some(&format!("Removed from position {}", removed.position)),
    )?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(RemoveMemberResult {
        name: removed.name,
        old_position: removed.position,
        new_picker,
    })
}

/// Complete the holder's turn.
///
/// # Errors
///
/// `EmptyQueue`, `CorruptQueue`, or `StorageFailure`.
pub fn advance_queue(conn: &mut Connection, clock: &dyn Clock) -> Result<AdvanceOutcome> {
    let tx = begin(conn)?;
    let now = clock.now();
    let ordered = MemberRepo::list_ordered(&tx)?;

    let outcome = match QueueShape::classify(ordered.len()) {
        QueueShape::Empty => return Err(QueueError::EmptyQueue.into()),
        QueueShape::Single => {
            let holder = &ordered[0];
            MemberRepo::record_completion(&tx, &holder.id, now)?;
            MemberRepo::set_picker_since(&tx, &holder.id, Some(now))?;
            ActivityRepo::append(
                &tx,
                now,
                ActivityAction::PickCompleted,
                Some(&holder.name),
                Some("Only member - remains current picker"),
            )?;
            AdvanceOutcome::SoleMemberCompleted {
                name: holder.name.clone(),
            }
        }
        QueueShape::Pair | QueueShape::Triple | QueueShape::QuadPlus => {
            let finished = &ordered[0];
            let order = rotate_to_back(&ids_of(&ordered));
            MemberRepo::reassign_positions(&tx, &positions(&order))?;

            MemberRepo::record_completion(&tx, &finished.id, now)?;
            MemberRepo::set_picker_since(&tx, &finished.id, None)?;
            MemberRepo::set_picker_since(&tx, &order[0], Some(now))?;

            let now_picking = name_of(&ordered, &order[0]);
            ActivityRepo::append(
                &tx,
                now,
                ActivityAction::QueueAdvanced,
                Some(&finished.name),
                Some(&format!("Moved to end, {} is now picking", now_picking)),
            )?;
            tracing::debug!(
                finished = %finished.name,
                now_picking = %now_picking,
                "rotated holder to back"
            );

            AdvanceOutcome::Advanced {
                finished: finished.name.clone(),
                now_picking,
            }
        }
    };

    tx.commit().map_err(from_rusqlite)?;
    Ok(outcome)
}

/// Let the holder pass their turn without it counting as a pick.
///
/// Preconditions are checked in order: a non-empty queue, more than one
/// member, then that `raw_name` is the holder.
///
/// # Errors
///
/// `EmptyQueue`, `CannotDefer`, `NotCurrentPicker`, `InvalidName`, or
/// `StorageFailure`.
pub fn defer_turn(conn: &mut Connection, raw_name: &str, clock: &dyn Clock) -> Result<DeferResult> {
    let tx = begin(conn)?;
    let now = clock.now();
    let ordered = MemberRepo::list_ordered(&tx)?;

    match QueueShape::classify(ordered.len()) {
        QueueShape::Empty => return Err(QueueError::EmptyQueue.into()),
        QueueShape::Single => {
            return Err(QueueError::CannotDefer {
                name: normalize_name(raw_name).unwrap_or_else(|_| ordered[0].name.clone()),
            }
            .into())
        }
        _ => {}
    }

    let name = normalize_name(raw_name)?;
    let holder = &ordered[0];
    if !same_member(&holder.name, &name) {
        let requester = ordered.iter().find(|m| same_member(&m.name, &name));
        let err: ExError = QueueError::NotCurrentPicker {
            name,
            current: holder.name.clone(),
        }
        .into();
        return Err(match requester {
            Some(m) => err.with_position(m.position),
            None => err,
        });
    }

    let (order, outcome) = defer_order(&ids_of(&ordered))?;
    MemberRepo::reassign_positions(&tx, &positions(&order))?;
    MemberRepo::set_picker_since(&tx, &holder.id, None)?;
    MemberRepo::set_picker_since(&tx, &order[0], Some(now))?;

    let now_picking = name_of(&ordered, &order[0]);
    ActivityRepo::append(
        &tx,
        now,
        ActivityAction::PickerDeferred,
        Some(&holder.name),
        Some(&format!("Deferred turn, {} is now picking", now_picking)),
    )?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(DeferResult {
        deferred: holder.name.clone(),
        now_picking,
        outcome,
    })
}

/// Log the start of an interactive session
///
/// # Errors
///
/// `StorageFailure` if the entry cannot be written.
pub fn record_startup(
    conn: &mut Connection,
    details: Option<&str>,
    clock: &dyn Clock,
) -> Result<i64> {
    let tx = begin(conn)?;
    let id = ActivityRepo::append(&tx, clock.now(), ActivityAction::BotStartup, None, details)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(id)
}
