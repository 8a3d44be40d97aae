//! Activity Log
//!
//! The log is append-only: the schema rejects UPDATE and DELETE on
//! `activity_log`, so the only write here is [`ActivityRepo::append`].

#![allow(clippy::result_large_err)]

use chrono::{DateTime, TimeZone, Utc};
use pickqueue_core::clock::{format_timestamp, parse_timestamp};
use pickqueue_core::errors::{ExError, ExErrorKind};
use pickqueue_core::{ActivityAction, ActivityEntry, HistoryLimit};
use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry and return its id
    pub fn append(
        conn: &Connection,
        now: DateTime<Utc>,
        action: ActivityAction,
        member_name: Option<&str>,
        details: Option<&str>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO activity_log (timestamp, action, member_name, details) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![format_timestamp(now), action.as_str(), member_name, details],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// The newest `limit` entries, newest first.
    ///
    /// Entries sharing a timestamp come back in reverse insertion order.
    pub fn recent(conn: &Connection, limit: HistoryLimit) -> Result<Vec<ActivityEntry>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, timestamp, action, member_name, details FROM activity_log
                 ORDER BY timestamp DESC, id DESC LIMIT ?1",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([limit.get()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(id, timestamp, action, member_name, details)| -> Result<ActivityEntry> {
                Ok(ActivityEntry {
                    id,
                    timestamp: parse_timestamp(&timestamp)?,
                    action: action.parse()?,
                    member_name,
                    details,
                })
            })
            .collect()
    }

    /// Number of `action` entries whose timestamp falls in calendar `year` (UTC)
    pub fn count_in_year(conn: &Connection, action: ActivityAction, year: i32) -> Result<u32> {
        let start = year_start(year)?;
        let end = year_start(year + 1)?;
        conn.query_row(
            "SELECT COUNT(*) FROM activity_log
             WHERE action = ?1 AND timestamp >= ?2 AND timestamp < ?3",
            rusqlite::params![action.as_str(), format_timestamp(start), format_timestamp(end)],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM activity_log", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

fn year_start(year: i32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("count_in_year")
                .with_message(format!("year {} out of range", year))
        })
}
