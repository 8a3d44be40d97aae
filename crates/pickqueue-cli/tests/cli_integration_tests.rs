//! CLI integration tests
//!
//! Each test drives the `pickqueue` binary against its own temp database.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("queue.db")
}

fn pickqueue(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pickqueue"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_add_next_and_queue() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = pickqueue(&db, &["add", "sarah", "johnson"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Added Sarah Johnson to the queue at position 1."));

    pickqueue(&db, &["add", "Bob"]);
    pickqueue(&db, &["add", "Carol"]);

    let output = pickqueue(&db, &["next"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Sarah Johnson has finished picking"));

    let output = pickqueue(&db, &["queue"]);
    let text = stdout(&output);
    assert!(text.contains("1. Bob (currently picking)"), "{}", text);
    assert!(text.contains("2. Carol"));
    assert!(text.contains("3. Sarah Johnson"));
}

#[test]
fn test_duplicate_add_fails_with_message() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    pickqueue(&db, &["add", "Sarah"]);
    let output = pickqueue(&db, &["add", "SARAH"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Sarah is already in the queue."));
}

#[test]
fn test_defer_by_non_holder_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    for name in ["Alice", "Bob"] {
        pickqueue(&db, &["add", name]);
    }

    let output = pickqueue(&db, &["defer", "Bob"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Only Alice (the current picker) can defer their turn."));

    let output = pickqueue(&db, &["defer", "alice"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Alice has swapped positions with the other member."));
}

#[test]
fn test_stats_and_history() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    pickqueue(&db, &["add", "Alice"]);
    pickqueue(&db, &["add", "Bob"]);
    pickqueue(&db, &["next"]);

    let output = pickqueue(&db, &["stats"]);
    let text = stdout(&output);
    assert!(text.contains("Total members: 2"), "{}", text);
    assert!(text.contains("1. Alice: 1 picks"));

    let output = pickqueue(&db, &["stats", "bob"]);
    assert!(stdout(&output).contains("Last pick: Never"));

    let output = pickqueue(&db, &["history", "--limit", "2"]);
    let text = stdout(&output);
    assert!(text.contains("Alice finished picking"));
    assert!(text.contains("Showing last 2 activities"));

    let output = pickqueue(&db, &["history", "--limit", "0"]);
    assert!(stdout(&output).contains("Showing last 1 activities"));
}

#[test]
fn test_remove_unknown_member() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = pickqueue(&db, &["remove", "Zed"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("I couldn't find Zed in the queue."));
}

#[test]
fn test_db_path_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("env.db");

    let output = Command::new(env!("CARGO_BIN_EXE_pickqueue"))
        .args(["add", "Alice"])
        .env("PICKQUEUE_DB", &db)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(db.exists());
}

#[test]
fn test_session_dispatches_prefixed_commands() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let mut child = Command::new(env!("CARGO_BIN_EXE_pickqueue"))
        .arg("--db")
        .arg(&db)
        .arg("session")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"hello everyone\n!add Alice\n!add\n!dance\n!add bob\n!defer Bob\n!help next\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Added Alice to the queue at position 1."));
    assert!(text.contains("I need a name to add to the queue!"));
    assert!(text.contains("Added Bob to the queue at position 2."));
    assert!(text.contains("Bob is not the current picker."));
    assert!(text.contains("Usage: !next"));
    assert!(!text.contains("dance"));

    let output = pickqueue(&db, &["history"]);
    let text = stdout(&output);
    assert_eq!(text.matches("Session started").count(), 1, "{}", text);
}
