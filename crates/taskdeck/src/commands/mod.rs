use std::io::Write;

use anyhow::{Context, Result, bail};
use taskdeck_app::{BoardSummary, ProjectConfig, RecentlyAdded, TaskBoard, ViewQuery, rows};
use taskdeck_core::{Clock, NewTask, SortMode, Task, TaskEdit, TaskId, split_due};
use taskdeck_store::BlobStore;
use tracing::debug;

use crate::render::{self, ListOutput};
use crate::{OneShot, ViewArgs};

/// Build the view request from command-line flags, falling back to config defaults.
pub fn view_query(args: &ViewArgs, config: &ProjectConfig) -> Result<ViewQuery> {
    let filter = match args.filter.as_deref() {
        Some(raw) => raw.parse()?,
        None => config.display.default_filter(),
    };
    let sort = args
        .sort
        .as_deref()
        .map_or_else(|| config.display.default_sort(), SortMode::from_token);
    Ok(ViewQuery {
        filter,
        query: args.query.clone().unwrap_or_default(),
        sort,
    })
}

/// Execute a one-shot command against `board`, writing output to `out`.
pub fn run<B, C, W>(
    command: OneShot,
    board: &mut TaskBoard<B>,
    config: &ProjectConfig,
    clock: &C,
    out: &mut W,
) -> Result<()>
where
    B: BlobStore,
    C: Clock,
    W: Write,
{
    let now = clock.now();
    match command {
        OneShot::Add {
            title,
            date,
            time,
            priority,
        } => {
            let input = NewTask {
                title,
                date: date.unwrap_or_default(),
                time: time.unwrap_or_default(),
                priority,
            };
            let Some(id) = board.add(input, now)? else {
                bail!("task title must not be blank");
            };
            writeln!(out, "added task: {id}")?;

            let mut recent = RecentlyAdded::new(config.display.new_highlight());
            recent.mark(id, now);
            let query = view_query(&ViewArgs::default(), config)?;
            print_board(board, &query, now, Some(&recent), out)
        }
        OneShot::Done { id } => set_completed(board, &id, true, out),
        OneShot::Undo { id } => set_completed(board, &id, false, out),
        OneShot::Edit {
            id,
            title,
            date,
            time,
            priority,
        } => {
            let edit = TaskEdit {
                title,
                date,
                time,
                priority,
            };
            if edit.is_empty() {
                bail!("nothing to edit; pass --title, --date, --time or --priority");
            }
            let id = resolve(board, &id)?;
            board.edit(&id, edit, now)?;
            let due = board.list().get(&id).and_then(Task::due);
            match split_due(due, board.offset()) {
                (date, time) if !date.is_empty() => {
                    writeln!(out, "updated task: {id} (due {date} {time})")?;
                }
                _ => writeln!(out, "updated task: {id}")?,
            }
            Ok(())
        }
        OneShot::Rm { id } => {
            let id = resolve(board, &id)?;
            board.delete(&id)?;
            writeln!(out, "deleted task: {id}")?;
            Ok(())
        }
        OneShot::ClearCompleted => {
            let removed = board.clear_completed()?;
            writeln!(out, "cleared {removed} completed task(s)")?;
            Ok(())
        }
        OneShot::Ls { view, json } => {
            let query = view_query(&view, config)?;
            if json {
                let view = board.view(&query, now);
                let summary = BoardSummary::from_view(&view, now, board.offset());
                let rows = rows(&view, now, board.offset(), None);
                writeln!(
                    out,
                    "{}",
                    serde_json::to_string_pretty(&ListOutput::new(&summary, &rows))?
                )?;
                Ok(())
            } else {
                print_board(board, &query, now, None, out)
            }
        }
    }
}

fn set_completed<B: BlobStore, W: Write>(
    board: &mut TaskBoard<B>,
    prefix: &str,
    value: bool,
    out: &mut W,
) -> Result<()> {
    let id = resolve(board, prefix)?;
    board.toggle_complete(&id, value)?;
    let verb = if value { "completed" } else { "reopened" };
    writeln!(out, "{verb} task: {id}")?;
    Ok(())
}

fn resolve<B: BlobStore>(board: &TaskBoard<B>, prefix: &str) -> Result<TaskId> {
    board
        .resolve(prefix)
        .with_context(|| format!("no task matches '{prefix}' (ids and unique prefixes are accepted)"))
}

fn print_board<B: BlobStore, W: Write>(
    board: &TaskBoard<B>,
    query: &ViewQuery,
    now: time::OffsetDateTime,
    recent: Option<&RecentlyAdded>,
    out: &mut W,
) -> Result<()> {
    debug!(?query, "Rendering view");
    let view = board.view(query, now);
    let summary = BoardSummary::from_view(&view, now, board.offset());
    let rows = rows(&view, now, board.offset(), recent);
    writeln!(out, "{}", render::board(&summary, &rows))?;
    Ok(())
}
