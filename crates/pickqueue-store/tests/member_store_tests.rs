#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use pickqueue_core::ExErrorKind;
use pickqueue_store::db::open_in_memory;
use pickqueue_store::MemberRepo;
use rusqlite::Connection;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
}

fn seeded(names: &[&str]) -> Connection {
    let conn = open_in_memory().unwrap();
    for name in names {
        MemberRepo::add(&conn, name, t0()).unwrap();
    }
    conn
}

fn names(conn: &Connection) -> Vec<String> {
    MemberRepo::list_ordered(conn)
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect()
}

#[test]
fn test_add_appends_with_normalized_name() {
    let conn = seeded(&["alice"]);
    let bob = MemberRepo::add(&conn, "  bob   SMITH ", t0()).unwrap();

    assert_eq!(bob.name, "Bob Smith");
    assert_eq!(bob.position, 2);
    assert_eq!(bob.pick_count, 0);
    assert!(bob.last_pick_date.is_none());
    assert!(bob.current_picker_since.is_none());
    assert_eq!(names(&conn), vec!["Alice", "Bob Smith"]);
}

#[test]
fn test_add_rejects_case_insensitive_duplicate() {
    let conn = seeded(&["Alice"]);
    let err = MemberRepo::add(&conn, "ALICE", t0()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateMember);
    assert_eq!(MemberRepo::count(&conn).unwrap(), 1);
}

#[test]
fn test_add_rejects_blank_name() {
    let conn = seeded(&[]);
    let err = MemberRepo::add(&conn, "   ", t0()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidName);
}

#[test]
fn test_remove_closes_gap() {
    let conn = seeded(&["Alice", "Bob", "Carol", "Dan"]);
    let removed = MemberRepo::remove_by_name(&conn, "bob").unwrap();

    assert_eq!(removed.name, "Bob");
    assert_eq!(removed.position, 2);
    assert_eq!(names(&conn), vec!["Alice", "Carol", "Dan"]);

    let positions: Vec<u32> = MemberRepo::list_ordered(&conn)
        .unwrap()
        .iter()
        .map(|m| m.position)
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_remove_unknown_member() {
    let conn = seeded(&["Alice"]);
    let err = MemberRepo::remove_by_name(&conn, "Zed").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MemberNotFound);
}

#[test]
fn test_reassign_positions_permutes_without_collision() {
    let conn = seeded(&["Alice", "Bob", "Carol"]);
    let members = MemberRepo::list_ordered(&conn).unwrap();
    let mapping = vec![
        (members[0].id.clone(), 3),
        (members[1].id.clone(), 1),
        (members[2].id.clone(), 2),
    ];

    MemberRepo::reassign_positions(&conn, &mapping).unwrap();
    assert_eq!(names(&conn), vec!["Bob", "Carol", "Alice"]);
}

#[test]
fn test_reassign_positions_rejects_partial_mapping() {
    let conn = seeded(&["Alice", "Bob", "Carol"]);
    let members = MemberRepo::list_ordered(&conn).unwrap();
    let mapping = vec![(members[1].id.clone(), 1), (members[0].id.clone(), 2)];

    let err = MemberRepo::reassign_positions(&conn, &mapping).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptQueue);
    assert_eq!(names(&conn), vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn test_list_ordered_detects_gap() {
    let conn = seeded(&["Alice", "Bob"]);
    conn.execute("UPDATE members SET position = 5 WHERE name = 'Bob'", [])
        .unwrap();

    let err = MemberRepo::list_ordered(&conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptQueue);
}

#[test]
fn test_negative_pick_count_is_corrupt() {
    let conn = seeded(&["Alice", "Bob"]);
    conn.execute("UPDATE members SET pick_count = -3 WHERE name = 'Bob'", [])
        .unwrap();

    let err = MemberRepo::list_ordered(&conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptQueue);
    assert!(err.message().contains("pick count -3"));
}

#[test]
fn test_completion_and_picker_stamp() {
    let conn = seeded(&["Alice"]);
    let alice = MemberRepo::find_by_name(&conn, "alice").unwrap().unwrap();
    let later = t0() + chrono::Duration::days(2);

    MemberRepo::set_picker_since(&conn, &alice.id, Some(t0())).unwrap();
    MemberRepo::record_completion(&conn, &alice.id, later).unwrap();

    let alice = MemberRepo::current_picker(&conn).unwrap().unwrap();
    assert_eq!(alice.pick_count, 1);
    assert_eq!(alice.last_pick_date, Some(later));
    assert_eq!(alice.current_picker_since, Some(t0()));

    MemberRepo::set_picker_since(&conn, &alice.id, None).unwrap();
    let alice = MemberRepo::member_at(&conn, 1).unwrap().unwrap();
    assert!(alice.current_picker_since.is_none());
}

#[test]
fn test_ranked_by_picks_order() {
    let conn = seeded(&["Alice", "Bob", "Carol", "Dan"]);
    let find = |n: &str| MemberRepo::find_by_name(&conn, n).unwrap().unwrap().id;

    // Bob and Carol tie on count; Carol picked more recently. Alice and Dan
    // never picked, so position decides.
    MemberRepo::record_completion(&conn, &find("Bob"), t0()).unwrap();
    MemberRepo::record_completion(&conn, &find("Carol"), t0() + chrono::Duration::days(1))
        .unwrap();

    let ranked: Vec<String> = MemberRepo::ranked_by_picks(&conn)
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(ranked, vec!["Carol", "Bob", "Alice", "Dan"]);
}
