use crate::task::Task;

/// Case-insensitive substring matcher for task titles.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Determine whether the task title contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.title().to_lowercase().contains(&self.needle)
    }
}

/// Apply an optional matcher; a missing matcher accepts everything.
#[must_use]
pub fn matches_query(matcher: Option<&TextMatcher>, task: &Task) -> bool {
    matcher.is_none_or(|matcher| matcher.matches(task))
}
