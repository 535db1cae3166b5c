use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::id::TaskId;
use crate::priority::Priority;

/// A single entry of the task list.
///
/// Fields are private so the title/priority invariants can only be changed
/// through [`TaskList`](crate::TaskList) operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(serialize_with = "serialize_due")]
    due: Option<OffsetDateTime>,
    completed: bool,
    #[serde(serialize_with = "serialize_millis")]
    created_at: OffsetDateTime,
    priority: Priority,
}

impl Task {
    /// Create a fresh, incomplete task. Returns `None` when the trimmed title is empty.
    #[must_use]
    pub fn new(
        title: &str,
        due: Option<OffsetDateTime>,
        priority: Priority,
        created_at: OffsetDateTime,
    ) -> Option<Self> {
        Self::restore(TaskId::new(), title, due, false, created_at, priority)
    }

    /// Rebuild a task from persisted fields. Returns `None` when the trimmed title is empty.
    #[must_use]
    pub fn restore(
        id: TaskId,
        title: &str,
        due: Option<OffsetDateTime>,
        completed: bool,
        created_at: OffsetDateTime,
        priority: Priority,
    ) -> Option<Self> {
        let title = normalize_title(title)?;
        Some(Self {
            id,
            title,
            due,
            completed,
            created_at,
            priority,
        })
    }

    /// Identifier of the task.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Trimmed, non-empty title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Due timestamp, if any.
    #[must_use]
    pub const fn due(&self) -> Option<OffsetDateTime> {
        self.due
    }

    /// Completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Priority of the task.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Replace the completion flag.
    pub const fn set_completed(&mut self, value: bool) {
        self.completed = value;
    }

    pub(crate) fn set_title(&mut self, title: &str) -> bool {
        match normalize_title(title) {
            Some(title) => {
                self.title = title;
                true
            }
            None => false,
        }
    }

    pub(crate) const fn set_due(&mut self, due: Option<OffsetDateTime>) {
        self.due = due;
    }

    pub(crate) const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Milliseconds since the Unix epoch, the unit used for `createdAt` in storage.
#[must_use]
pub fn unix_millis(ts: OffsetDateTime) -> i64 {
    i64::try_from(ts.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Inverse of [`unix_millis`]; `None` when out of the representable range.
#[must_use]
pub fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

fn serialize_due<S>(due: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match due {
        Some(ts) => {
            let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
            s.serialize_str(&text)
        }
        None => s.serialize_str(""),
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S>(ts: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_i64(unix_millis(*ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn new_rejects_blank_titles() {
        let now = datetime!(2025-01-01 00:00 UTC);
        assert!(Task::new("   ", None, Priority::Medium, now).is_none());
        assert!(Task::new("", None, Priority::Medium, now).is_none());
    }

    #[test]
    fn new_trims_title_and_starts_incomplete() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let task = Task::new("  Buy milk  ", None, Priority::High, now)
            .unwrap_or_else(|| panic!("task must be created"));
        assert_eq!(task.title(), "Buy milk");
        assert!(!task.completed());
        assert_eq!(task.created_at(), now);
    }

    #[test]
    fn set_title_keeps_previous_on_blank() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let mut task = Task::new("Old", None, Priority::Low, now)
            .unwrap_or_else(|| panic!("task must be created"));
        assert!(!task.set_title("  "));
        assert_eq!(task.title(), "Old");
        assert!(task.set_title(" New "));
        assert_eq!(task.title(), "New");
    }

    #[test]
    fn serializes_storage_shape() {
        let created = datetime!(2025-01-01 00:00 UTC);
        let task = Task::restore(
            "abc".parse().unwrap_or_else(|err| panic!("id: {err}")),
            "Buy milk",
            Some(datetime!(2025-01-01 09:00 UTC)),
            true,
            created,
            Priority::High,
        )
        .unwrap_or_else(|| panic!("task must be restored"));

        let value = serde_json::to_value(&task).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(value["id"], "abc");
        assert_eq!(value["due"], "2025-01-01T09:00:00Z");
        assert_eq!(value["completed"], true);
        assert_eq!(value["createdAt"], 1_735_689_600_000_i64);
        assert_eq!(value["priority"], "high");
    }

    #[test]
    fn missing_due_serializes_as_empty_string() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let task = Task::new("No date", None, Priority::Medium, now)
            .unwrap_or_else(|| panic!("task must be created"));
        let value = serde_json::to_value(&task).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(value["due"], "");
    }

    #[test]
    fn millis_roundtrip_through_epoch() {
        let ts = datetime!(2025-01-01 09:00:00.123 UTC);
        let millis = unix_millis(ts);
        assert_eq!(millis, 1_735_722_000_123);
        assert_eq!(from_unix_millis(millis), Some(ts));
    }
}
