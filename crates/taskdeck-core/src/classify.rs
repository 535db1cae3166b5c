//! Due-state classification and relative due phrasing.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::task::Task;

const MINUTE_MS: i128 = 60_000;
const HOUR_MS: i128 = 3_600_000;
const DAY_MS: i128 = 86_400_000;

/// Text shown wherever a task has no due date.
pub const NO_DUE_DATE: &str = "No due date";

/// Classification of a task relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    /// Open and not past due.
    Pending,
    /// Open and past its due timestamp.
    Overdue,
    /// Marked complete.
    Completed,
}

impl DueState {
    /// Lowercase label used in badges and filter tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a task. Completion wins over any due date.
#[must_use]
pub fn due_state(task: &Task, now: OffsetDateTime) -> DueState {
    if task.completed() {
        return DueState::Completed;
    }
    match task.due() {
        Some(due) if due < now => DueState::Overdue,
        _ => DueState::Pending,
    }
}

/// Human readable distance between `due` and `now`, e.g. "Due in 3h" or "Overdue by 2d".
#[must_use]
pub fn relative_due(due: Option<OffsetDateTime>, now: OffsetDateTime) -> String {
    let Some(due) = due else {
        return NO_DUE_DATE.to_owned();
    };
    let diff = diff_millis(due, now);
    let abs = diff.abs();
    let minutes = round_div(abs, MINUTE_MS);
    let hours = round_div(abs, HOUR_MS);
    let days = round_div(abs, DAY_MS);

    if diff < 0 {
        if minutes < 60 {
            format!("Overdue by {minutes}m")
        } else if hours < 24 {
            format!("Overdue by {hours}h")
        } else {
            format!("Overdue by {days}d")
        }
    } else if minutes < 60 {
        format!("Due in {minutes}m")
    } else if hours < 48 {
        format!("Due in {hours}h")
    } else {
        format!("Due in {days}d")
    }
}

/// [`relative_due`] for raw RFC 3339 text; blank or unparseable input has no due date.
#[must_use]
pub fn relative_due_str(raw: &str, now: OffsetDateTime) -> String {
    relative_due(parse_due(raw), now)
}

/// Parse a stored due timestamp. Blank or malformed text yields `None`.
#[must_use]
pub fn parse_due(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    OffsetDateTime::parse(trimmed, &Rfc3339).ok()
}

/// True when `due` falls in the next 24 hours, excluding `now` itself.
#[must_use]
pub fn is_due_soon(due: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    due.is_some_and(|due| {
        let diff = diff_millis(due, now);
        diff > 0 && diff <= DAY_MS
    })
}

/// Absolute due text in `offset`, e.g. "Jan 1, 2025, 9:00 AM".
#[must_use]
pub fn format_due(due: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    let Some(due) = due else {
        return NO_DUE_DATE.to_owned();
    };
    let local = due.to_offset(offset);
    let format = format_description!(
        "[month repr:short] [day padding:none], [year], [hour repr:12 padding:none]:[minute] [period]"
    );
    local
        .format(format)
        .unwrap_or_else(|_| NO_DUE_DATE.to_owned())
}

fn diff_millis(due: OffsetDateTime, now: OffsetDateTime) -> i128 {
    (due - now).whole_milliseconds()
}

// Half-up rounding for non-negative values.
const fn round_div(value: i128, unit: i128) -> i128 {
    (value + unit / 2) / unit
}

/// Filter applied to the due state of each task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StateFilter {
    /// Keep every task.
    #[default]
    All,
    /// Keep only tasks in the given state.
    Only(DueState),
}

impl StateFilter {
    /// Whether a task in `state` passes this filter.
    #[must_use]
    pub fn accepts(self, state: DueState) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == state,
        }
    }

    /// Token form of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(state) => state.as_str(),
        }
    }
}

/// Error for filter tokens outside `all|pending|overdue|completed`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid filter: {token} (expected all, pending, overdue or completed)")]
pub struct InvalidStateFilter {
    /// Offending input.
    pub token: String,
}

impl FromStr for StateFilter {
    type Err = InvalidStateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Only(DueState::Pending)),
            "overdue" => Ok(Self::Only(DueState::Overdue)),
            "completed" => Ok(Self::Only(DueState::Completed)),
            _ => Err(InvalidStateFilter {
                token: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
