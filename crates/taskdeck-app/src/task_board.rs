//! Task list state container shared by every front-end.

use taskdeck_core::{
    NewTask, SortMode, StateFilter, TaskEdit, TaskId, TaskList, TaskView, build_view,
};
use taskdeck_store::{BlobStore, StoreError, TaskSnapshotStore};
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

use crate::summary::BoardSummary;

/// Errors surfaced by [`TaskBoard`]. Only storage can fail; the in-memory
/// list has already been updated when a write error is returned.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Reading or writing the task blob failed.
    #[error("failed to access task storage: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Filter, search text and sort order of a view request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Due-state filter.
    pub filter: StateFilter,
    /// Free-text title search.
    pub query: String,
    /// Ordering of the result.
    pub sort: SortMode,
}

/// Owns the task list and writes it back after every accepted mutation.
pub struct TaskBoard<B> {
    list: TaskList,
    store: TaskSnapshotStore<B>,
    offset: UtcOffset,
}

impl<B: BlobStore> TaskBoard<B> {
    /// Load the list stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the blob store cannot be read. Corrupt data is not an error.
    pub fn open(blobs: B, key: &str, offset: UtcOffset, now: OffsetDateTime) -> BoardResult<Self> {
        let store = TaskSnapshotStore::new(blobs, key);
        let list = store.load(now)?;
        Ok(Self {
            list,
            store,
            offset,
        })
    }

    /// Current tasks.
    #[must_use]
    pub const fn list(&self) -> &TaskList {
        &self.list
    }

    /// Offset used for date defaults and formatting.
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Resolve an id or unique id prefix.
    #[must_use]
    pub fn resolve(&self, id_or_prefix: &str) -> Option<TaskId> {
        self.list.resolve_prefix(id_or_prefix).cloned()
    }

    /// Add a task. Blank titles are ignored and nothing is written.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn add(&mut self, input: NewTask, now: OffsetDateTime) -> BoardResult<Option<TaskId>> {
        let Some(id) = self.list.add(input, now, self.offset) else {
            debug!("Ignoring task with blank title");
            return Ok(None);
        };
        info!(task = %id, "Added task");
        self.persist()?;
        Ok(Some(id))
    }

    /// Set the completion flag of a task.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn toggle_complete(&mut self, id: &TaskId, value: bool) -> BoardResult<bool> {
        if !self.list.toggle_complete(id, value) {
            debug!(task = %id, "Toggle ignored for unknown task");
            return Ok(false);
        }
        info!(task = %id, completed = value, "Updated completion");
        self.persist()?;
        Ok(true)
    }

    /// Apply a partial edit.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn edit(&mut self, id: &TaskId, edit: TaskEdit, now: OffsetDateTime) -> BoardResult<bool> {
        if !self.list.edit(id, edit, now, self.offset) {
            debug!(task = %id, "Edit ignored for unknown task");
            return Ok(false);
        }
        info!(task = %id, "Edited task");
        self.persist()?;
        Ok(true)
    }

    /// Delete a task.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn delete(&mut self, id: &TaskId) -> BoardResult<bool> {
        let removed = self.list.delete(id);
        info!(task = %id, removed, "Deleted task");
        self.persist()?;
        Ok(removed)
    }

    /// Drop every completed task and return how many were removed.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn clear_completed(&mut self) -> BoardResult<usize> {
        let removed = self.list.clear_completed();
        info!(removed, "Cleared completed tasks");
        self.persist()?;
        Ok(removed)
    }

    /// Build the view for `query` at `now`.
    #[must_use]
    pub fn view(&self, query: &ViewQuery, now: OffsetDateTime) -> TaskView<'_> {
        build_view(self.list.tasks(), query.filter, &query.query, query.sort, now)
    }

    /// Header summary for the whole board.
    #[must_use]
    pub fn summary(&self, now: OffsetDateTime) -> BoardSummary {
        let view = self.view(&ViewQuery::default(), now);
        BoardSummary::from_view(&view, now, self.offset)
    }

    fn persist(&self) -> BoardResult<()> {
        self.store.save(&self.list)?;
        debug!(key = self.store.key(), tasks = self.list.len(), "Persisted tasks");
        Ok(())
    }
}
