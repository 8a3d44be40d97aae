#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use pickqueue_core::{FixedClock, Member};
use pickqueue_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult, EngineOptions,
};
use pickqueue_store::MemberRepo;
use rusqlite::Connection;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub fn setup() -> (Connection, FixedClock) {
    let conn = pickqueue_store::db::open_in_memory().unwrap();
    (conn, FixedClock::new(t0()))
}

pub fn run(conn: &mut Connection, clock: &FixedClock, cmd: EngineCommand) -> EngineCommandResult {
    apply_engine_command(cmd, conn, clock, EngineOptions::default()).unwrap()
}

pub fn add(conn: &mut Connection, clock: &FixedClock, name: &str) {
    run(conn, clock, EngineCommand::AddMember { name: name.into() });
}

pub fn seeded(names: &[&str]) -> (Connection, FixedClock) {
    let (mut conn, clock) = setup();
    for name in names {
        add(&mut conn, &clock, name);
    }
    (conn, clock)
}

pub fn members(conn: &Connection) -> Vec<Member> {
    MemberRepo::list_ordered(conn).unwrap()
}

pub fn order(conn: &Connection) -> Vec<String> {
    members(conn).into_iter().map(|m| m.name).collect()
}

pub fn member(conn: &Connection, name: &str) -> Member {
    MemberRepo::find_by_name(conn, name).unwrap().unwrap()
}

pub fn log_actions(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT action FROM activity_log ORDER BY id ASC")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

/// Positions are exactly 1..=N and only position 1 may carry a stamp
pub fn assert_queue_invariants(conn: &Connection) {
    let raw: Vec<(i64, Option<String>)> = {
        let mut stmt = conn
            .prepare("SELECT position, current_picker_since FROM members ORDER BY position")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    };
    for (i, (position, _)) in raw.iter().enumerate() {
        assert_eq!(*position, i as i64 + 1, "positions not dense: {:?}", raw);
    }
    let stamped: Vec<i64> = raw
        .iter()
        .filter(|(_, since)| since.is_some())
        .map(|(p, _)| *p)
        .collect();
    assert!(
        stamped.is_empty() || stamped == vec![1],
        "stamp outside position 1: {:?}",
        raw
    );
}
