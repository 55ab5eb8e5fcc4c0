use proptest::prelude::*;
use std::collections::BTreeSet;

use cardwall_core::board::BoardState;
use cardwall_core::model::{Column, Service, Task, UserRef, tags};
use cardwall_core::stats::ServiceStats;

fn arb_column() -> impl Strategy<Value = Column> {
    prop_oneof![Just(Column::New), Just(Column::Work), Just(Column::Done)]
}

/// Boards with arbitrary (possibly gappy or duplicated) server ordinals.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((arb_column(), 0usize..20), 0..30).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (column, order))| Task {
                id: format!("t{i}"),
                title: format!("task {i}"),
                description: None,
                tags: Vec::new(),
                column,
                color: None,
                order,
                assignees: Vec::new(),
            })
            .collect()
    })
}

fn arb_ids(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec((0u8..8).prop_map(|n| format!("u{n}")), 0..max)
}

fn assert_contiguous(board: &BoardState, column: Column) -> Result<(), TestCaseError> {
    let orders: Vec<usize> = board.column(column).iter().map(|t| t.order).collect();
    let expected: Vec<usize> = (0..orders.len()).collect();
    prop_assert_eq!(orders, expected);
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn renumber_yields_zero_to_n(tasks in arb_tasks()) {
        let mut board = BoardState::new();
        board.load(tasks);
        for column in Column::ALL {
            board.renumber(column);
            assert_contiguous(&board, column)?;
        }
    }

    #[test]
    fn move_then_renumber_is_idempotent(
        tasks in arb_tasks(),
        pick in any::<prop::sample::Index>(),
        target in arb_column(),
    ) {
        prop_assume!(!tasks.is_empty());
        let id = tasks[pick.index(tasks.len())].id.clone();

        let mut board = BoardState::new();
        board.load(tasks);
        for column in Column::ALL {
            board.renumber(column);
        }

        let apply = |board: &mut BoardState| {
            let from = board.get(&id).map(|t| t.column).unwrap_or(target);
            if from != target {
                let _ = board.move_task(&id, target);
            }
            board.renumber(from);
            board.renumber(target);
        };

        apply(&mut board);
        let once = board.clone();
        apply(&mut board);
        prop_assert_eq!(&board, &once);
        for column in Column::ALL {
            assert_contiguous(&board, column)?;
        }
    }

    #[test]
    fn completion_rate_is_a_percentage(tasks in arb_tasks()) {
        let service = Service {
            id: "s".into(),
            name: String::new(),
            chief: None,
            project_manager: None,
            assigned_resources: Vec::new(),
            backup: Vec::new(),
            task_board: None,
        };
        let stats = ServiceStats::derive(&tasks, &service);
        prop_assert!((0.0..=100.0).contains(&stats.completion_rate));
        prop_assert_eq!(stats.total, tasks.len());
        if stats.completed == 0 {
            prop_assert!(stats.completion_rate.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn members_are_the_union_of_roles(
        chief in proptest::option::of((0u8..8).prop_map(|n| format!("u{n}"))),
        manager in proptest::option::of((0u8..8).prop_map(|n| format!("u{n}"))),
        resources in arb_ids(6),
        backup in arb_ids(6),
    ) {
        let expected: BTreeSet<String> = chief
            .iter()
            .chain(manager.iter())
            .chain(resources.iter())
            .chain(backup.iter())
            .cloned()
            .collect();
        let service = Service {
            id: "s".into(),
            name: String::new(),
            chief: chief.map(UserRef::new),
            project_manager: manager.map(UserRef::new),
            assigned_resources: resources.into_iter().map(UserRef::new).collect(),
            backup: backup.into_iter().map(UserRef::new).collect(),
            task_board: None,
        };
        prop_assert_eq!(ServiceStats::derive(&[], &service).total_members, expected.len());
    }

    #[test]
    fn tag_join_then_parse_keeps_the_set(
        raw in prop::collection::vec("[ ]{0,2}[a-z0-9-]{0,8}[ ]{0,2}", 0..8),
    ) {
        let reparsed: BTreeSet<String> = tags::parse(&tags::join(&raw)).into_iter().collect();
        let expected: BTreeSet<String> = raw
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        prop_assert!(reparsed.iter().all(|tag| tag == tag.trim() && !tag.is_empty()));
        prop_assert_eq!(&reparsed, &expected);

        let normalized: BTreeSet<String> = tags::normalize(&raw).into_iter().collect();
        prop_assert_eq!(normalized, expected);
    }
}
