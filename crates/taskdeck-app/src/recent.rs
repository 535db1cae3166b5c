//! Presentation-side memory of freshly added tasks.

use std::collections::HashMap;

use taskdeck_core::TaskId;
use time::{Duration, OffsetDateTime};

/// Ids added recently enough to be highlighted. Never persisted.
#[derive(Debug, Clone)]
pub struct RecentlyAdded {
    window: Duration,
    added: HashMap<TaskId, OffsetDateTime>,
}

impl RecentlyAdded {
    /// Track additions for `window` after they happen.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            added: HashMap::new(),
        }
    }

    /// Remember that `id` was added at `now`.
    pub fn mark(&mut self, id: TaskId, now: OffsetDateTime) {
        self.added.insert(id, now);
    }

    /// Whether `id` should still render as new.
    #[must_use]
    pub fn is_new(&self, id: &TaskId, now: OffsetDateTime) -> bool {
        self.added
            .get(id)
            .is_some_and(|added| now - *added < self.window)
    }

    /// Forget expired entries.
    pub fn prune(&mut self, now: OffsetDateTime) {
        let window = self.window;
        self.added.retain(|_, added| now - *added < window);
    }

    /// Number of tracked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len()
    }

    /// Returns true when nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn highlight_expires_after_window() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let id = TaskId::new();
        let mut recent = RecentlyAdded::new(Duration::milliseconds(400));
        recent.mark(id.clone(), now);

        assert!(recent.is_new(&id, now));
        assert!(recent.is_new(&id, now + Duration::milliseconds(399)));
        assert!(!recent.is_new(&id, now + Duration::milliseconds(400)));
        assert!(!recent.is_new(&TaskId::new(), now));
    }

    #[test]
    fn prune_drops_expired_ids() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let mut recent = RecentlyAdded::new(Duration::seconds(1));
        recent.mark(TaskId::new(), now);
        recent.mark(TaskId::new(), now + Duration::milliseconds(800));

        recent.prune(now + Duration::milliseconds(1_200));
        assert_eq!(recent.len(), 1);
        recent.prune(now + Duration::seconds(5));
        assert!(recent.is_empty());
    }
}
