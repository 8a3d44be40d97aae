//! Engine-level mutating commands.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use pickqueue_core::errors::ExError;
use pickqueue_core::{log_op_end, log_op_error, log_op_start, Clock, DeferOutcome};
use pickqueue_core_types::RequestId;
use pickqueue_store::errors::Result;
use rusqlite::Connection;

use crate::commands::queue_ops::{self, AdvanceOutcome};

/// What happens to the stamp of the member who moves into position 1 when
/// the holder is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalHandoff {
    /// The successor keeps no `current_picker_since` until the next handoff
    LeaveUnstamped,
    /// The successor is stamped with the removal time
    #[default]
    StampSuccessor,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub removal_handoff: RemovalHandoff,
}

/// Mutating commands accepted by the engine
#[derive(Debug, Clone)]
pub enum EngineCommand {
    AddMember { name: String },
    RemoveMember { name: String },
    /// `next`: complete the holder's turn
    AdvanceQueue,
    /// Holder passes without it counting as a pick
    DeferTurn { name: String },
    RecordStartup { details: Option<String> },
}

impl EngineCommand {
    /// Operation name used in log events
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::AddMember { .. } => "add_member",
            EngineCommand::RemoveMember { .. } => "remove_member",
            EngineCommand::AdvanceQueue => "advance_queue",
            EngineCommand::DeferTurn { .. } => "defer_turn",
            EngineCommand::RecordStartup { .. } => "record_startup",
        }
    }
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    MemberAdded {
        name: String,
        position: u32,
    },
    MemberRemoved {
        name: String,
        old_position: u32,
        new_picker: Option<String>,
    },
    Advanced {
        finished: String,
        now_picking: String,
    },
    SoleMemberCompleted {
        name: String,
    },
    Deferred {
        deferred: String,
        now_picking: String,
        outcome: DeferOutcome,
    },
    StartupRecorded {
        entry_id: i64,
    },
}

/// Apply a mutating command.
///
/// # Errors
///
/// Domain rejections (`DuplicateMember`, `MemberNotFound`, `EmptyQueue`,
/// `CannotDefer`, `NotCurrentPicker`, `InvalidName`) leave the store
/// untouched, as does `StorageFailure`.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    clock: &dyn Clock,
    options: EngineOptions,
) -> Result<EngineCommandResult> {
    let op = cmd.op_name();
    let request_id = RequestId::new();
    let start = Instant::now();
    log_op_start!(op, request_id = request_id.as_str());

    let result = dispatch(cmd, conn, clock, options);

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(r) => {
            log_op_end!(op, duration_ms = duration_ms, request_id = request_id.as_str());
            Ok(r)
        }
        Err(e) => {
            let e = with_context(e, op, request_id.clone());
            log_op_error!(
                op,
                e.clone(),
                duration_ms = duration_ms,
                request_id = request_id.as_str()
            );
            Err(e)
        }
    }
}

fn dispatch(
    cmd: EngineCommand,
    conn: &mut Connection,
    clock: &dyn Clock,
    options: EngineOptions,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::AddMember { name } => {
            let r = queue_ops::add_member(conn, &name, clock)?;
            Ok(EngineCommandResult::MemberAdded {
                name: r.name,
                position: r.position,
            })
        }
        EngineCommand::RemoveMember { name } => {
            let r = queue_ops::remove_member(conn, &name, clock, options.removal_handoff)?;
            Ok(EngineCommandResult::MemberRemoved {
                name: r.name,
                old_position: r.old_position,
                new_picker: r.new_picker,
            })
        }
        EngineCommand::AdvanceQueue => match queue_ops::advance_queue(conn, clock)? {
            AdvanceOutcome::Advanced {
                finished,
                now_picking,
            } => Ok(EngineCommandResult::Advanced {
                finished,
                now_picking,
            }),
            AdvanceOutcome::SoleMemberCompleted { name } => {
                Ok(EngineCommandResult::SoleMemberCompleted { name })
            }
        },
        EngineCommand::DeferTurn { name } => {
            let r = queue_ops::defer_turn(conn, &name, clock)?;
            Ok(EngineCommandResult::Deferred {
                deferred: r.deferred,
                now_picking: r.now_picking,
                outcome: r.outcome,
            })
        }
        EngineCommand::RecordStartup { details } => {
            let entry_id = queue_ops::record_startup(conn, details.as_deref(), clock)?;
            Ok(EngineCommandResult::StartupRecorded { entry_id })
        }
    }
}

/// Attach the engine op and request id; an op already set by a lower layer
/// (e.g. `sqlite`) is kept.
pub(crate) fn with_context(e: ExError, op: &str, request_id: RequestId) -> ExError {
    let e = if e.op().is_none() { e.with_op(op) } else { e };
    e.with_request_id(request_id)
}
