#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, TimeZone, Utc};
use pickqueue_core::{ActivityAction, HistoryLimit};
use pickqueue_store::db::open_in_memory;
use pickqueue_store::ActivityRepo;

#[test]
fn test_recent_is_newest_first_with_id_tiebreak() {
    let conn = open_in_memory().unwrap();
    let t = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

    ActivityRepo::append(&conn, t, ActivityAction::MemberAdded, Some("Alice"), None).unwrap();
    let second =
        ActivityRepo::append(&conn, t, ActivityAction::MemberAdded, Some("Bob"), None).unwrap();
    let newest = ActivityRepo::append(
        &conn,
        t + Duration::seconds(1),
        ActivityAction::QueueAdvanced,
        Some("Alice"),
        Some("now picking: Bob"),
    )
    .unwrap();

    let entries = ActivityRepo::recent(&conn, HistoryLimit::default()).unwrap();
    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids[0], newest);
    assert_eq!(ids[1], second);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].details.as_deref(), Some("now picking: Bob"));
    assert_eq!(entries[2].member_name.as_deref(), Some("Alice"));
}

#[test]
fn test_recent_honours_limit() {
    let conn = open_in_memory().unwrap();
    let t = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
    for i in 0..15 {
        ActivityRepo::append(
            &conn,
            t + Duration::minutes(i),
            ActivityAction::BotStartup,
            None,
            None,
        )
        .unwrap();
    }

    assert_eq!(
        ActivityRepo::recent(&conn, HistoryLimit::clamped(Some(3)))
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        ActivityRepo::recent(&conn, HistoryLimit::default())
            .unwrap()
            .len(),
        10
    );
    assert_eq!(ActivityRepo::count(&conn).unwrap(), 15);
}

#[test]
fn test_count_in_year_uses_calendar_boundaries() {
    let conn = open_in_memory().unwrap();
    let new_years_eve = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
    let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    ActivityRepo::append(&conn, new_years_eve, ActivityAction::QueueAdvanced, Some("A"), None)
        .unwrap();
    ActivityRepo::append(&conn, new_year, ActivityAction::QueueAdvanced, Some("B"), None).unwrap();
    ActivityRepo::append(&conn, new_year, ActivityAction::PickCompleted, Some("B"), None).unwrap();

    assert_eq!(
        ActivityRepo::count_in_year(&conn, ActivityAction::QueueAdvanced, 2025).unwrap(),
        1
    );
    assert_eq!(
        ActivityRepo::count_in_year(&conn, ActivityAction::QueueAdvanced, 2026).unwrap(),
        1
    );
    assert_eq!(
        ActivityRepo::count_in_year(&conn, ActivityAction::PickCompleted, 2026).unwrap(),
        1
    );
}
