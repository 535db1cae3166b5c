//! Task model, due-state classification and view building for taskdeck.
//!
//! Everything in this crate is pure: the current time is always passed in
//! explicitly, and nothing touches storage or the terminal.

/// Due-state classification and relative due text.
pub mod classify;
/// Sources of the current time.
pub mod clock;
/// Date/time input handling.
pub mod due;
/// Identifier types.
pub mod id;
/// The ordered task collection.
pub mod list;
/// Task priorities.
pub mod priority;
/// The task record.
pub mod task;
/// Query matching.
pub mod text_matcher;
/// Filtered and sorted views.
pub mod view;

pub use classify::{
    DueState, InvalidStateFilter, NO_DUE_DATE, StateFilter, due_state, format_due, is_due_soon,
    parse_due, relative_due, relative_due_str,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use due::{build_due, split_due};
pub use id::TaskId;
pub use list::{NewTask, TaskEdit, TaskList};
pub use priority::{InvalidPriority, Priority};
pub use task::Task;
pub use text_matcher::TextMatcher;
pub use view::{SortMode, TaskStats, TaskView, build_view, next_due, sort_tasks};
