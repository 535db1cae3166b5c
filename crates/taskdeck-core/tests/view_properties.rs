//! Property tests for classification and view building.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use taskdeck_core::{
    DueState, Priority, SortMode, StateFilter, Task, TaskStats, build_view, due_state,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const NOW: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

#[derive(Debug, Clone)]
struct Seed {
    title: String,
    due_minutes: Option<i64>,
    priority: Priority,
    completed: bool,
    created_minutes: i64,
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
    ]
}

fn filter_strategy() -> impl Strategy<Value = StateFilter> {
    prop_oneof![
        Just(StateFilter::All),
        Just(StateFilter::Only(DueState::Pending)),
        Just(StateFilter::Only(DueState::Overdue)),
        Just(StateFilter::Only(DueState::Completed)),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::DueAsc),
        Just(SortMode::DueDesc),
        Just(SortMode::Newest),
        Just(SortMode::Oldest),
        Just(SortMode::Priority),
        Just(SortMode::Unsorted),
    ]
}

fn seed_strategy() -> impl Strategy<Value = Seed> {
    (
        "[a-z]{1,8}",
        prop::option::of(-10_000i64..10_000),
        priority_strategy(),
        any::<bool>(),
        -10_000i64..0,
    )
        .prop_map(|(title, due_minutes, priority, completed, created_minutes)| Seed {
            title,
            due_minutes,
            priority,
            completed,
            created_minutes,
        })
}

fn materialize(seeds: &[Seed]) -> Vec<Task> {
    seeds
        .iter()
        .map(|seed| {
            let mut task = Task::new(
                &seed.title,
                seed.due_minutes.map(|m| NOW + Duration::minutes(m)),
                seed.priority,
                NOW + Duration::minutes(seed.created_minutes),
            )
            .expect("generated titles are never blank");
            task.set_completed(seed.completed);
            task
        })
        .collect()
}

proptest! {
    #[test]
    fn completed_tasks_always_classify_as_completed(seeds in prop::collection::vec(seed_strategy(), 0..32)) {
        for task in materialize(&seeds) {
            let state = due_state(&task, NOW);
            if task.completed() {
                prop_assert_eq!(state, DueState::Completed);
            } else {
                prop_assert_ne!(state, DueState::Completed);
            }
        }
    }

    #[test]
    fn view_is_a_permutation_of_the_filtered_tasks(
        seeds in prop::collection::vec(seed_strategy(), 0..32),
        filter in filter_strategy(),
        sort in sort_strategy(),
        query in "[a-z]{0,2}",
    ) {
        let tasks = materialize(&seeds);
        let view = build_view(&tasks, filter, &query, sort, NOW);

        let mut expected: Vec<&str> = tasks
            .iter()
            .filter(|task| task.title().contains(query.as_str()))
            .filter(|task| filter.accepts(due_state(task, NOW)))
            .map(|task| task.id().as_str())
            .collect();
        let mut actual: Vec<&str> = view.items.iter().map(|task| task.id().as_str()).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn stats_do_not_depend_on_filter_or_query(
        seeds in prop::collection::vec(seed_strategy(), 0..32),
        filter in filter_strategy(),
        query in "[a-z]{0,3}",
    ) {
        let tasks = materialize(&seeds);
        let view = build_view(&tasks, filter, &query, SortMode::DueAsc, NOW);
        prop_assert_eq!(view.stats, TaskStats::collect(&tasks, NOW));
        prop_assert_eq!(view.stats.total, tasks.len());
        prop_assert_eq!(view.stats.done + view.stats.pending + view.stats.overdue, tasks.len());
    }

    #[test]
    fn priority_sort_never_inverts_ranks(seeds in prop::collection::vec(seed_strategy(), 0..32)) {
        let tasks = materialize(&seeds);
        let view = build_view(&tasks, StateFilter::All, "", SortMode::Priority, NOW);
        for pair in view.items.windows(2) {
            prop_assert!(pair[0].priority().rank() >= pair[1].priority().rank());
        }
    }
}
