//! Ordered in-memory task collection and its mutation operations.

use std::collections::HashSet;
use time::{OffsetDateTime, UtcOffset};

use crate::due::build_due;
use crate::id::TaskId;
use crate::priority::Priority;
use crate::task::Task;

/// Raw form inputs for a new task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Title text; blank titles are rejected.
    pub title: String,
    /// `YYYY-MM-DD` or blank.
    pub date: String,
    /// `HH:MM` or blank.
    pub time: String,
    /// Priority token; invalid or blank means medium.
    pub priority: String,
}

/// Partial update of an existing task. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    /// Replacement title; ignored when blank.
    pub title: Option<String>,
    /// Due date input; supplying either date or time recomputes the due date.
    pub date: Option<String>,
    /// Due time input.
    pub time: Option<String>,
    /// Priority token; ignored when not one of high/medium/low.
    pub priority: Option<String>,
}

impl TaskEdit {
    /// Returns true when the edit carries no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.time.is_none() && self.priority.is_none()
    }
}

/// Ordered task collection, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Build a list from loaded tasks, keeping the first occurrence of each id.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut seen = HashSet::new();
        let tasks = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id().clone()))
            .collect();
        Self { tasks }
    }

    /// Borrow every task in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when the list holds no task.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Resolve a unique id prefix to the full id.
    #[must_use]
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&TaskId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .tasks
            .iter()
            .map(Task::id)
            .filter(|id| id.starts_with(prefix));
        let first = matches.next()?;
        if first.as_str() == prefix || matches.next().is_none() {
            return Some(first);
        }
        self.tasks
            .iter()
            .map(Task::id)
            .find(|id| id.as_str() == prefix)
    }

    fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Prepend a new task. Returns `None` without touching the list when the title is blank.
    pub fn add(&mut self, input: NewTask, now: OffsetDateTime, offset: UtcOffset) -> Option<TaskId> {
        let due = build_due(&input.date, &input.time, now, offset);
        let priority = Priority::parse_or_default(&input.priority);
        let task = Task::new(&input.title, due, priority, now)?;
        let id = task.id().clone();
        self.tasks.insert(0, task);
        Some(id)
    }

    /// Set the completion flag. Returns false when the id is unknown.
    pub fn toggle_complete(&mut self, id: &TaskId, value: bool) -> bool {
        self.get_mut(id).is_some_and(|task| {
            task.set_completed(value);
            true
        })
    }

    /// Apply a partial edit. Returns false when the id is unknown.
    pub fn edit(&mut self, id: &TaskId, edit: TaskEdit, now: OffsetDateTime, offset: UtcOffset) -> bool {
        let Some(task) = self.get_mut(id) else {
            return false;
        };
        let TaskEdit {
            title,
            date,
            time,
            priority,
        } = edit;

        if let Some(title) = title {
            task.set_title(&title);
        }
        if date.is_some() || time.is_some() {
            let due = build_due(
                date.as_deref().unwrap_or_default(),
                time.as_deref().unwrap_or_default(),
                now,
                offset,
            );
            task.set_due(due);
        }
        if let Some(priority) = priority.and_then(|raw| raw.parse::<Priority>().ok()) {
            task.set_priority(priority);
        }
        true
    }

    /// Remove a task. Returns false when the id is unknown.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        self.tasks.len() != before
    }

    /// Remove every completed task and return how many were dropped.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed());
        before - self.tasks.len()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
