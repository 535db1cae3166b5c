//! JSON encoding of the task list blob.
//!
//! Decoding never fails: a blob that is not a JSON array yields an empty
//! list, and individual records are repaired or skipped.
//! Records without a usable id get a fresh one.

use serde::Deserialize;
use serde_json::Value;
use taskdeck_core::task::from_unix_millis;
use taskdeck_core::{Priority, Task, TaskId, TaskList, parse_due};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Loosely typed persisted record. Unknown fields (including the legacy
/// `_new` animation flag) are ignored by serde.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    due: Value,
    #[serde(default)]
    completed: Value,
    #[serde(default)]
    created_at: Value,
    #[serde(default)]
    priority: Priority,
}

impl TaskRecord {
    fn into_task(self, loaded_at: OffsetDateTime) -> Option<Task> {
        let id = match &self.id {
            Value::String(raw) => raw.parse::<TaskId>().ok(),
            Value::Number(num) => num.to_string().parse::<TaskId>().ok(),
            _ => None,
        }
        .unwrap_or_default();
        let title = self.title.as_str()?;
        let due = self.due.as_str().and_then(parse_due);
        let completed = self.completed.as_bool().unwrap_or(false);
        let created_at = parse_created_at(&self.created_at).unwrap_or(loaded_at);
        Task::restore(id, title, due, completed, created_at, self.priority)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_created_at(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Number(num) => num
            .as_i64()
            .or_else(|| num.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            .and_then(from_unix_millis),
        Value::String(raw) => OffsetDateTime::parse(raw.trim(), &Rfc3339).ok(),
        _ => None,
    }
}

/// Decode a stored blob into a task list.
///
/// `loaded_at` stands in for records that lack a creation timestamp.
#[must_use]
pub fn decode_tasks(raw: &str, loaded_at: OffsetDateTime) -> TaskList {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!(kind = value_kind(&other), "Stored tasks are not an array; starting empty");
            return TaskList::new();
        }
        Err(err) => {
            warn!(%err, "Stored tasks are not valid JSON; starting empty");
            return TaskList::new();
        }
    };

    let total = records.len();
    let tasks: Vec<Task> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let task = serde_json::from_value::<TaskRecord>(value)
                .ok()
                .and_then(|record| record.into_task(loaded_at));
            if task.is_none() {
                warn!(index, "Skipping unreadable task record");
            }
            task
        })
        .collect();

    let list = TaskList::from_tasks(tasks);
    if list.len() != total {
        debug!(total, kept = list.len(), "Dropped invalid or duplicate task records");
    }
    list
}

/// Encode the whole list as a JSON array.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode_tasks(list: &TaskList) -> Result<String, StoreError> {
    Ok(serde_json::to_string(list.tasks())?)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
