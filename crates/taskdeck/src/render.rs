//! Plain-text rendering of board summaries and task rows.

use serde::Serialize;
use taskdeck_app::{BoardSummary, EMPTY_VIEW_MESSAGE, TaskRow};
use taskdeck_core::{DueState, TaskStats};
use unicode_segmentation::UnicodeSegmentation;

/// Widest title shown before truncation, in grapheme clusters.
const TITLE_WIDTH: usize = 40;
const SHORT_ID_LEN: usize = 8;

/// JSON shape printed by `ls --json`.
#[derive(Debug, Serialize)]
pub struct ListOutput<'a> {
    pub status: String,
    pub progress: &'a str,
    pub percent: usize,
    pub next_due: &'a str,
    pub stats: TaskStats,
    pub items: &'a [TaskRow],
}

impl<'a> ListOutput<'a> {
    pub fn new(summary: &'a BoardSummary, rows: &'a [TaskRow]) -> Self {
        Self {
            status: summary.status.to_string(),
            progress: &summary.progress_text,
            percent: summary.percent,
            next_due: &summary.next_due_text,
            stats: summary.stats,
            items: rows,
        }
    }
}

/// Header lines: progress, status, next due and counters.
pub fn header_lines(summary: &BoardSummary) -> Vec<String> {
    let stats = &summary.stats;
    vec![
        format!("{} ({}%)", summary.progress_text, summary.percent),
        format!("Status: {}", summary.status),
        summary.next_due_text.clone(),
        format!(
            "pending {} · overdue {} · due soon {} · done {}",
            stats.pending, stats.overdue, stats.soon, stats.done
        ),
    ]
}

/// A single task line.
pub fn row_line(row: &TaskRow) -> String {
    let check = if row.completed { "[x]" } else { "[ ]" };
    let marker = if row.is_new { "+" } else { " " };
    format!(
        "{marker}{check} {title:<width$}  {state:<9} {priority:<6} {due}  {id}",
        title = truncate(&row.title, TITLE_WIDTH),
        width = TITLE_WIDTH,
        state = state_badge(row.state),
        priority = row.priority.as_str(),
        due = row.due_text,
        id = short_id(row.id.as_str()),
    )
}

/// Header, a blank separator and every row, or the empty-view message.
pub fn board(summary: &BoardSummary, rows: &[TaskRow]) -> String {
    let mut lines = header_lines(summary);
    lines.push(String::new());
    if rows.is_empty() {
        lines.push(EMPTY_VIEW_MESSAGE.to_owned());
    } else {
        lines.extend(rows.iter().map(row_line));
    }
    lines.join("\n")
}

const fn state_badge(state: DueState) -> &'static str {
    match state {
        DueState::Pending => "pending",
        DueState::Overdue => "OVERDUE",
        DueState::Completed => "done",
    }
}

fn truncate(title: &str, max: usize) -> String {
    let graphemes: Vec<&str> = title.graphemes(true).collect();
    if graphemes.len() <= max {
        return title.to_owned();
    }
    let mut out: String = graphemes[..max.saturating_sub(1)].concat();
    out.push('…');
    out
}

fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}
