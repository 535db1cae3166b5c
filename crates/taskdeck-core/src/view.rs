//! Filtered, searched and sorted projections of the task list.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use time::OffsetDateTime;

use crate::classify::{DueState, StateFilter, due_state, is_due_soon};
use crate::task::Task;
use crate::text_matcher::{TextMatcher, matches_query};

/// Ordering applied to the filtered tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Earliest due first; tasks without a due date last.
    #[default]
    DueAsc,
    /// Latest due first; tasks without a due date first.
    DueDesc,
    /// Most recently created first.
    Newest,
    /// Oldest created first.
    Oldest,
    /// High, then medium, then low.
    Priority,
    /// Keep store order.
    Unsorted,
}

impl SortMode {
    /// Parse a sort token. Unknown tokens map to [`SortMode::Unsorted`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "due-asc" => Self::DueAsc,
            "due-desc" => Self::DueDesc,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "priority" => Self::Priority,
            _ => Self::Unsorted,
        }
    }

    /// Token form of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueAsc => "due-asc",
            Self::DueDesc => "due-desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Priority => "priority",
            Self::Unsorted => "unsorted",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueAsc => compare_due(a, b),
            Self::DueDesc => compare_due(b, a),
            Self::Newest => b.created_at().cmp(&a.created_at()),
            Self::Oldest => a.created_at().cmp(&b.created_at()),
            Self::Priority => b.priority().rank().cmp(&a.priority().rank()),
            Self::Unsorted => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A missing due date behaves as +infinity.
fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due(), b.due()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort of `tasks` by `mode`.
pub fn sort_tasks(tasks: &mut [&Task], mode: SortMode) {
    if mode == SortMode::Unsorted {
        return;
    }
    tasks.sort_by(|a, b| mode.compare(a, b));
}

/// Aggregate counters over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Completed tasks.
    pub done: usize,
    /// Open tasks that are not overdue.
    pub pending: usize,
    /// Open tasks past their due date.
    pub overdue: usize,
    /// Open tasks due within the next 24 hours.
    pub soon: usize,
}

impl TaskStats {
    /// Compute statistics over every task, ignoring any filter.
    #[must_use]
    pub fn collect(tasks: &[Task], now: OffsetDateTime) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match due_state(task, now) {
                DueState::Completed => stats.done += 1,
                DueState::Pending => stats.pending += 1,
                DueState::Overdue => stats.overdue += 1,
            }
            if !task.completed() && is_due_soon(task.due(), now) {
                stats.soon += 1;
            }
        }
        stats
    }

    /// Completed share as a whole percentage (half-up), 0 for an empty store.
    #[must_use]
    pub const fn percent_done(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.done * 200 + self.total) / (self.total * 2)
    }
}

/// Earliest-due incomplete task; ties keep store order.
#[must_use]
pub fn next_due(tasks: &[Task]) -> Option<&Task> {
    tasks
        .iter()
        .filter(|task| !task.completed())
        .filter_map(|task| task.due().map(|due| (due, task)))
        .min_by_key(|(due, _)| *due)
        .map(|(_, task)| task)
}

/// Everything a front-end needs to draw the list.
#[derive(Debug, Clone)]
pub struct TaskView<'a> {
    /// Filtered and sorted tasks.
    pub items: Vec<&'a Task>,
    /// Counters over the unfiltered store.
    pub stats: TaskStats,
    /// Incomplete task with the earliest due date.
    pub next_due: Option<&'a Task>,
}

impl TaskView<'_> {
    /// Returns true when no task survived filtering.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the filtered, searched and sorted view of `tasks`.
#[must_use]
pub fn build_view<'a>(
    tasks: &'a [Task],
    filter: StateFilter,
    query: &str,
    sort: SortMode,
    now: OffsetDateTime,
) -> TaskView<'a> {
    let matcher = TextMatcher::new(query);
    let mut items: Vec<&Task> = tasks
        .iter()
        .filter(|task| matches_query(matcher.as_ref(), task))
        .filter(|task| filter.accepts(due_state(task, now)))
        .collect();
    sort_tasks(&mut items, sort);

    TaskView {
        items,
        stats: TaskStats::collect(tasks, now),
        next_due: next_due(tasks),
    }
}
