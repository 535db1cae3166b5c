//! Display-ready summaries derived from a [`TaskView`].

use std::fmt;

use serde::Serialize;
use taskdeck_core::{
    DueState, Priority, Task, TaskId, TaskStats, TaskView, due_state, format_due, relative_due,
};
use time::{OffsetDateTime, UtcOffset};

use crate::recent::RecentlyAdded;

/// Message shown when filtering leaves nothing.
pub const EMPTY_VIEW_MESSAGE: &str = "No tasks match this view yet.";

/// Headline status, in priority order: overdue, due soon, progress, idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Some tasks are overdue.
    Overdue(usize),
    /// Nothing overdue, but some tasks are due within a day.
    DueSoon(usize),
    /// Percent of tasks completed.
    Progress(usize),
    /// The store is empty.
    Idle,
}

impl StatusIndicator {
    /// Pick the most pressing status for `stats`.
    #[must_use]
    pub const fn from_stats(stats: &TaskStats) -> Self {
        if stats.overdue > 0 {
            Self::Overdue(stats.overdue)
        } else if stats.soon > 0 {
            Self::DueSoon(stats.soon)
        } else if stats.total > 0 {
            Self::Progress(stats.percent_done())
        } else {
            Self::Idle
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue(count) => write!(f, "{count} overdue"),
            Self::DueSoon(count) => write!(f, "{count} due soon"),
            Self::Progress(percent) => write!(f, "{percent}% done"),
            Self::Idle => f.write_str("Stay organized"),
        }
    }
}

/// Header block: progress, status and next due task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    /// Raw counters.
    pub stats: TaskStats,
    /// `done / total` as a whole percentage.
    pub percent: usize,
    /// "N of M tasks completed".
    pub progress_text: String,
    /// Headline status.
    pub status: StatusIndicator,
    /// "Next: ..." or "No due dates yet".
    pub next_due_text: String,
}

impl BoardSummary {
    /// Summarize a built view.
    #[must_use]
    pub fn from_view(view: &TaskView<'_>, now: OffsetDateTime, offset: UtcOffset) -> Self {
        let stats = view.stats;
        let next_due_text = view.next_due.map_or_else(
            || "No due dates yet".to_owned(),
            |task| {
                format!(
                    "Next: {} ({})",
                    format_due(task.due(), offset),
                    relative_due(task.due(), now)
                )
            },
        );
        Self {
            stats,
            percent: stats.percent_done(),
            progress_text: format!("{} of {} tasks completed", stats.done, stats.total),
            status: StatusIndicator::from_stats(&stats),
            next_due_text,
        }
    }
}

/// One rendered line of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Task identifier (for edit/delete).
    pub id: TaskId,
    /// Title text.
    pub title: String,
    /// Checkbox state.
    pub completed: bool,
    /// State badge.
    pub state: DueState,
    /// Priority badge.
    pub priority: Priority,
    /// Formatted and relative due text, or "No due date".
    pub due_text: String,
    /// Freshly added (entrance highlight).
    pub is_new: bool,
}

impl TaskRow {
    /// Build the row for `task`.
    #[must_use]
    pub fn from_task(
        task: &Task,
        now: OffsetDateTime,
        offset: UtcOffset,
        recent: Option<&RecentlyAdded>,
    ) -> Self {
        let due_text = match task.due() {
            Some(_) => format!(
                "{} • {}",
                format_due(task.due(), offset),
                relative_due(task.due(), now)
            ),
            None => taskdeck_core::NO_DUE_DATE.to_owned(),
        };
        Self {
            id: task.id().clone(),
            title: task.title().to_owned(),
            completed: task.completed(),
            state: due_state(task, now),
            priority: task.priority(),
            due_text,
            is_new: recent.is_some_and(|recent| recent.is_new(task.id(), now)),
        }
    }
}

/// Rows for every item of `view`, in view order.
#[must_use]
pub fn rows(
    view: &TaskView<'_>,
    now: OffsetDateTime,
    offset: UtcOffset,
    recent: Option<&RecentlyAdded>,
) -> Vec<TaskRow> {
    view.items
        .iter()
        .map(|task| TaskRow::from_task(task, now, offset, recent))
        .collect()
}
