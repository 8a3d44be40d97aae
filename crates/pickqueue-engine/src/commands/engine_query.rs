//! Engine-level read-only query surface.
//!
//! `apply_engine_query` takes a shared connection and never writes. Each
//! query reads inside one deferred transaction, so it sees a single
//! consistent snapshot even while another connection is committing.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::Datelike;
use pickqueue_core::errors::ExError;
use pickqueue_core::{
    log_op_end, log_op_error, log_op_start, ActivityAction, ActivityEntry, Clock, HistoryLimit,
    QueueError,
};
use pickqueue_core_types::RequestId;
use pickqueue_store::errors::{from_rusqlite, Result};
use pickqueue_store::{ActivityRepo, MemberRepo};
use rusqlite::Connection;

use crate::commands::engine_command::with_context;
use crate::commands::read_tools::{
    GlobalStats, MemberStats, PickerSummary, QueueEntry, RankedMember,
};

/// Read-only queries supported by the engine
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// The full rotation, position 1 first
    Queue,
    /// Stats for one member, or queue-wide stats when `name` is `None`
    Stats { name: Option<String> },
    /// Most recent activity; `limit` is clamped into `[1, 50]`
    History { limit: Option<i64> },
}

impl EngineQuery {
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineQuery::Queue => "queue_view",
            EngineQuery::Stats { name: Some(_) } => "member_stats",
            EngineQuery::Stats { name: None } => "global_stats",
            EngineQuery::History { .. } => "history",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineQueryResult {
    Queue(Vec<QueueEntry>),
    MemberStats(MemberStats),
    GlobalStats(GlobalStats),
    History(Vec<ActivityEntry>),
}

/// Apply a read-only query.
///
/// # Errors
///
/// `MemberNotFound` for stats on an unknown name, `CorruptQueue` if stored
/// positions are not dense, `StorageFailure` otherwise.
pub fn apply_engine_query(
    query: EngineQuery,
    conn: &Connection,
    clock: &dyn Clock,
) -> Result<EngineQueryResult> {
    let op = query.op_name();
    let request_id = RequestId::new();
    let start = Instant::now();
    log_op_start!(op, request_id = request_id.as_str());

    let result = (|| -> Result<EngineQueryResult> {
        let tx = conn.unchecked_transaction().map_err(from_rusqlite)?;
        let now = clock.now();

        let r = match query {
            EngineQuery::Queue => EngineQueryResult::Queue(
                MemberRepo::list_ordered(&tx)?
                    .into_iter()
                    .map(|m| QueueEntry {
                        position: m.position,
                        is_current_picker: m.is_current_picker(),
                        days_as_picker: m.days_as_picker(now),
                        name: m.name,
                    })
                    .collect(),
            ),
            EngineQuery::Stats { name: Some(name) } => {
                let m = MemberRepo::find_by_name(&tx, &name)?
                    .ok_or_else(|| ExError::from(QueueError::MemberNotFound { name }))?;
                EngineQueryResult::MemberStats(MemberStats {
                    position: m.position,
                    pick_count: m.pick_count,
                    join_date: m.join_date,
                    last_pick_date: m.last_pick_date,
                    is_current_picker: m.is_current_picker(),
                    days_as_picker: m.days_as_picker(now),
                    name: m.name,
                })
            }
            EngineQuery::Stats { name: None } => {
                EngineQueryResult::GlobalStats(global_stats(&tx, now)?)
            }
            EngineQuery::History { limit } => {
                EngineQueryResult::History(ActivityRepo::recent(&tx, HistoryLimit::clamped(limit))?)
            }
        };

        // Read-only: nothing to commit.
        tx.rollback().map_err(from_rusqlite)?;
        Ok(r)
    })();

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

fn global_stats(conn: &Connection, now: chrono::DateTime<chrono::Utc>) -> Result<GlobalStats> {
    let year = now.year();
    let advances_this_year =
        ActivityRepo::count_in_year(conn, ActivityAction::QueueAdvanced, year)?;
    let completions_this_year =
        ActivityRepo::count_in_year(conn, ActivityAction::PickCompleted, year)?;

    let current_picker = MemberRepo::current_picker(conn)?.map(|m| PickerSummary {
        days_as_picker: m.days_as_picker(now),
        name: m.name,
    });

    let ranked: Vec<RankedMember> = MemberRepo::ranked_by_picks(conn)?
        .into_iter()
        .enumerate()
        .map(|(i, m)| RankedMember {
            rank: i + 1,
            name: m.name,
            pick_count: m.pick_count,
            last_pick_date: m.last_pick_date,
        })
        .collect();

    Ok(GlobalStats {
        member_count: ranked.len() as u32,
        year,
        advances_this_year,
        completions_this_year,
        picks_this_year: advances_this_year + completions_this_year,
        current_picker,
        ranked,
    })
}
