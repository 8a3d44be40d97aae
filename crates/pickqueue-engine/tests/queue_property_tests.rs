#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::Duration;
use common::*;
use pickqueue_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineOptions, RemovalHandoff,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["Ann", "Ben", "Cat", "Dov", "Eve", "Fay"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Next,
    /// Defer as the current holder
    DeferHolder,
    /// Defer as someone who may not be holder
    Defer(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len()).prop_map(Op::Add),
        (0..NAMES.len()).prop_map(Op::Remove),
        Just(Op::Next),
        Just(Op::DeferHolder),
        (0..NAMES.len()).prop_map(Op::Defer),
    ]
}

fn to_command(op: &Op, conn: &rusqlite::Connection) -> EngineCommand {
    match op {
        Op::Add(i) => EngineCommand::AddMember {
            name: NAMES[*i].into(),
        },
        Op::Remove(i) => EngineCommand::RemoveMember {
            name: NAMES[*i].into(),
        },
        Op::Next => EngineCommand::AdvanceQueue,
        Op::DeferHolder => EngineCommand::DeferTurn {
            name: order(conn)
                .first()
                .cloned()
                .unwrap_or_else(|| NAMES[0].to_string()),
        },
        Op::Defer(i) => EngineCommand::DeferTurn {
            name: NAMES[*i].into(),
        },
    }
}

proptest! {
    #[test]
    fn prop_random_ops_keep_queue_dense_and_single_stamped(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let (mut conn, clock) = setup();
        let options = EngineOptions { removal_handoff: RemovalHandoff::StampSuccessor };

        for op in &ops {
            clock.advance(Duration::minutes(7));
            let before = members(&conn);
            let cmd = to_command(op, &conn);
            match apply_engine_command(cmd, &mut conn, &clock, options) {
                Ok(_) => {}
                // Rejections must leave the store untouched
                Err(_) => prop_assert_eq!(members(&conn), before),
            }
            assert_queue_invariants(&conn);

            // With successor stamping the holder is always stamped
            if let Some(holder) = members(&conn).first() {
                prop_assert!(holder.current_picker_since.is_some());
            }
        }
    }

    #[test]
    fn prop_pick_counts_sum_to_completed_turns(turns in 1usize..25, size in 1usize..6) {
        let (mut conn, clock) = seeded(&NAMES[..size]);
        for _ in 0..turns {
            apply_engine_command(
                EngineCommand::AdvanceQueue,
                &mut conn,
                &clock,
                EngineOptions::default(),
            )
            .unwrap();
        }
        let total: u32 = members(&conn).iter().map(|m| m.pick_count).sum();
        prop_assert_eq!(total as usize, turns);
    }
}
