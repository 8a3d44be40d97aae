//! Member Store
//!
//! All functions take a `&Connection`; pass a `&Transaction` (it derefs) to
//! make several calls one atomic unit. Name arguments are raw user input and
//! are normalized here before any lookup or write.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use pickqueue_core::clock::{format_timestamp, parse_timestamp};
use pickqueue_core::errors::{ExError, ExErrorKind, QueueError};
use pickqueue_core::names::normalize_name;
use pickqueue_core::rotation::{check_dense, close_gap, positions};
use pickqueue_core::Member;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, Result};

const MEMBER_COLUMNS: &str =
    "id, name, position, join_date, pick_count, last_pick_date, current_picker_since";

/// Raw column values, converted to a `Member` outside the rusqlite closure
struct MemberRow {
    id: String,
    name: String,
    position: i64,
    join_date: String,
    pick_count: i64,
    last_pick_date: Option<String>,
    current_picker_since: Option<String>,
}

impl MemberRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            position: row.get(2)?,
            join_date: row.get(3)?,
            pick_count: row.get(4)?,
            last_pick_date: row.get(5)?,
            current_picker_since: row.get(6)?,
        })
    }

    fn into_member(self) -> Result<Member> {
        let position = u32::try_from(self.position).map_err(|_| {
            ExError::from(QueueError::CorruptQueue {
                reason: format!("member {} has position {}", self.name, self.position),
            })
        })?;
        let pick_count = u32::try_from(self.pick_count).map_err(|_| {
            ExError::from(QueueError::CorruptQueue {
                reason: format!("member {} has pick count {}", self.name, self.pick_count),
            })
        })?;
        Ok(Member {
            id: self.id,
            name: self.name,
            position,
            join_date: parse_timestamp(&self.join_date)?,
            pick_count,
            last_pick_date: self
                .last_pick_date
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            current_picker_since: self
                .current_picker_since
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

fn collect_members(rows: Vec<MemberRow>) -> Result<Vec<Member>> {
    rows.into_iter().map(MemberRow::into_member).collect()
}

/// SQLite-backed Member Store
pub struct MemberRepo;

impl MemberRepo {
    /// Append a new member at position `N + 1`.
    ///
    /// The member is created without a picker stamp; the engine decides
    /// whether they become holder.
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank name, `DuplicateMember` if a member with
    /// the same name (ignoring case) exists.
    pub fn add(conn: &Connection, raw_name: &str, now: DateTime<Utc>) -> Result<Member> {
        let name = normalize_name(raw_name)?;

        if let Some(existing) = Self::find_by_name(conn, &name)? {
            return Err(QueueError::DuplicateMember {
                name: existing.name,
            }
            .into());
        }

        let position = Self::count(conn)? + 1;
        let member = Member::new(uuid::Uuid::now_v7().to_string(), name, position, now);

        conn.execute(
            "INSERT INTO members (id, name, position, join_date, pick_count) VALUES (?1, ?2, ?3, ?4, 0)",
            rusqlite::params![
                member.id,
                member.name,
                member.position,
                format_timestamp(member.join_date),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ExError::from(QueueError::DuplicateMember {
                    name: member.name.clone(),
                })
            }
            other => from_rusqlite(other),
        })?;

        Ok(member)
    }

    /// Delete a member and close the gap they leave.
    ///
    /// Returns the member as they were before deletion, so `position` is the
    /// vacated slot.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` if no member matches.
    pub fn remove_by_name(conn: &Connection, raw_name: &str) -> Result<Member> {
        let name = normalize_name(raw_name)?;
        let ordered = Self::list_ordered(conn)?;

        let index = ordered
            .iter()
            .position(|m| m.name.to_lowercase() == name.to_lowercase())
            .ok_or_else(|| ExError::from(QueueError::MemberNotFound { name: name.clone() }))?;

        let removed = ordered[index].clone();
        conn.execute("DELETE FROM members WHERE id = ?1", [&removed.id])
            .map_err(from_rusqlite)?;

        let ids: Vec<String> = ordered.into_iter().map(|m| m.id).collect();
        Self::reassign_positions(conn, &positions(&close_gap(&ids, index)))?;

        Ok(removed)
    }

    /// All members, position 1 first.
    ///
    /// # Errors
    ///
    /// `CorruptQueue` if the stored positions are not exactly `1..=N`.
    pub fn list_ordered(conn: &Connection) -> Result<Vec<Member>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM members ORDER BY position ASC",
                MEMBER_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], MemberRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let members = collect_members(rows)?;
        let slots: Vec<u32> = members.iter().map(|m| m.position).collect();
        check_dense(&slots)?;
        Ok(members)
    }

    /// The member at `position`, if any
    pub fn member_at(conn: &Connection, position: u32) -> Result<Option<Member>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM members WHERE position = ?1", MEMBER_COLUMNS),
                [position],
                MemberRow::from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;
        row.map(MemberRow::into_member).transpose()
    }

    /// The current picker (position 1), if the queue is non-empty
    pub fn current_picker(conn: &Connection) -> Result<Option<Member>> {
        Self::member_at(conn, 1)
    }

    pub fn count(conn: &Connection) -> Result<u32> {
        conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(conn: &Connection, raw_name: &str) -> Result<Option<Member>> {
        let name = normalize_name(raw_name)?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM members WHERE name = ?1 COLLATE NOCASE",
                    MEMBER_COLUMNS
                ),
                [&name],
                MemberRow::from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;
        row.map(MemberRow::into_member).transpose()
    }

    /// Members ranked by picks (desc), most recent pick (desc, never-picked
    /// last), then position.
    pub fn ranked_by_picks(conn: &Connection) -> Result<Vec<Member>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM members
                 ORDER BY pick_count DESC, last_pick_date DESC NULLS LAST, position ASC",
                MEMBER_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], MemberRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        collect_members(rows)
    }

    /// Apply a complete `(member id, new position)` mapping as one batch.
    ///
    /// The mapping must cover every member and be dense. Rows are first
    /// parked on negative positions and then flipped, so the `UNIQUE`
    /// position index never sees a transient collision.
    ///
    /// # Errors
    ///
    /// `CorruptQueue` if the mapping is not a dense permutation of the
    /// current membership.
    pub fn reassign_positions(conn: &Connection, mapping: &[(String, u32)]) -> Result<()> {
        let mut slots: Vec<u32> = mapping.iter().map(|(_, p)| *p).collect();
        slots.sort_unstable();
        check_dense(&slots)?;

        let count = Self::count(conn)?;
        if count as usize != mapping.len() {
            return Err(QueueError::CorruptQueue {
                reason: format!(
                    "position mapping covers {} of {} members",
                    mapping.len(),
                    count
                ),
            }
            .into());
        }

        let mut park = conn
            .prepare("UPDATE members SET position = -?1 WHERE id = ?2")
            .map_err(from_rusqlite)?;
        for (id, position) in mapping {
            let updated = park
                .execute(rusqlite::params![position, id])
                .map_err(from_rusqlite)?;
            if updated != 1 {
                return Err(QueueError::CorruptQueue {
                    reason: format!("position mapping names unknown member id {}", id),
                }
                .into());
            }
        }

        conn.execute(
            "UPDATE members SET position = -position WHERE position < 0",
            [],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Count a completed turn: `pick_count + 1`, `last_pick_date = now`
    pub fn record_completion(conn: &Connection, member_id: &str, now: DateTime<Utc>) -> Result<()> {
        Self::expect_one(
            conn.execute(
                "UPDATE members SET pick_count = pick_count + 1, last_pick_date = ?1 WHERE id = ?2",
                rusqlite::params![format_timestamp(now), member_id],
            )
            .map_err(from_rusqlite)?,
            member_id,
        )
    }

    /// Set or clear a member's `current_picker_since`
    pub fn set_picker_since(
        conn: &Connection,
        member_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<()> {
        Self::expect_one(
            conn.execute(
                "UPDATE members SET current_picker_since = ?1 WHERE id = ?2",
                rusqlite::params![since.map(format_timestamp), member_id],
            )
            .map_err(from_rusqlite)?,
            member_id,
        )
    }

    fn expect_one(updated: usize, member_id: &str) -> Result<()> {
        if updated == 1 {
            Ok(())
        } else {
            Err(ExError::new(ExErrorKind::Internal)
                .with_op("member_update")
                .with_message(format!("expected one row for member id {}", member_id)))
        }
    }
}
