//! Live view: re-render the board on a fixed tick so due states and
//! relative texts stay current.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use taskdeck_app::{BoardSummary, TaskBoard, ViewQuery, rows};
use taskdeck_core::Clock;
use taskdeck_store::BlobStore;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::render;

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday], [month repr:short] [day padding:none], [hour]:[minute]:[second]"
);

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Render every `interval` until Ctrl-C, or until `ticks` frames were drawn.
pub fn run<B, C, W>(
    board: &TaskBoard<B>,
    query: &ViewQuery,
    clock: &C,
    interval: Duration,
    ticks: Option<u64>,
    out: &mut W,
) -> Result<()>
where
    B: BlobStore,
    C: Clock,
    W: Write,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the tick runtime")?;

    runtime.block_on(async {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut drawn = 0_u64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    draw(board, query, clock, out)?;
                    drawn += 1;
                    if ticks.is_some_and(|limit| drawn >= limit) {
                        break;
                    }
                }
                result = &mut ctrl_c => {
                    result.context("failed to listen for Ctrl-C")?;
                    debug!(drawn, "Stopping live view");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn draw<B: BlobStore, C: Clock, W: Write>(
    board: &TaskBoard<B>,
    query: &ViewQuery,
    clock: &C,
    out: &mut W,
) -> Result<()> {
    let now = clock.now();
    let view = board.view(query, now);
    let summary = BoardSummary::from_view(&view, now, board.offset());
    let rows = rows(&view, now, board.offset(), None);
    let stamp = now.to_offset(board.offset()).format(CLOCK_FORMAT)?;

    write!(out, "{CLEAR_SCREEN}")?;
    writeln!(out, "{stamp}")?;
    writeln!(out, "{}", render::board(&summary, &rows))?;
    out.flush()?;
    Ok(())
}
