//! CLI entry point for taskdeck.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use time::UtcOffset;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use taskdeck_app::{ProjectConfig, TaskBoard};
use taskdeck_core::{Clock, SystemClock};
use taskdeck_store::FileBlobStore;

mod commands;
mod render;
mod watch;

/// Local task list with due dates and priorities.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: a local task list with due dates, priorities and live due states"
)]
struct Cli {
    /// Data directory holding config.toml and the task blob.
    #[arg(long)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Once(OneShot),

    /// Keep re-rendering the list on a fixed tick.
    Watch {
        #[command(flatten)]
        view: ViewArgs,
        /// Stop after this many ticks.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

/// Commands that run once and exit.
#[derive(Subcommand, Debug)]
enum OneShot {
    /// Add a task.
    Add {
        title: String,
        /// Due date as YYYY-MM-DD (defaults to today when only --time is given).
        #[arg(long)]
        date: Option<String>,
        /// Due time as HH:MM (defaults to 23:59 when only --date is given).
        #[arg(long)]
        time: Option<String>,
        /// high, medium or low.
        #[arg(short = 'p', long, default_value = "medium")]
        priority: String,
    },

    /// Mark a task as completed.
    Done { id: String },

    /// Mark a task as not completed.
    Undo { id: String },

    /// Change fields of a task; omitted fields are kept.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
    },

    /// Delete a task.
    Rm { id: String },

    /// Delete every completed task.
    ClearCompleted,

    /// Show the filtered and sorted task list.
    Ls {
        #[command(flatten)]
        view: ViewArgs,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// View selection shared by `ls` and `watch`.
#[derive(Args, Debug, Clone, Default)]
struct ViewArgs {
    /// all, pending, overdue or completed.
    #[arg(long)]
    filter: Option<String>,
    /// Case-insensitive title search.
    #[arg(short = 'q', long)]
    query: Option<String>,
    /// due-asc, due-desc, newest, oldest or priority.
    #[arg(long)]
    sort: Option<String>,
}

fn main() -> Result<()> {
    // The local offset can only be read while the process is single-threaded.
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let Cli { dir, cmd } = Cli::parse();
    install_tracing();

    let dir = resolve_dir(dir)?;
    execute_command(&dir, cmd, local_offset)
}

fn execute_command(dir: &Path, command: Command, local_offset: UtcOffset) -> Result<()> {
    let config = ProjectConfig::from_dir(dir)?;
    let blobs = FileBlobStore::open(dir)
        .with_context(|| format!("failed to open data directory {}", dir.display()))?;
    let mut board = TaskBoard::open(
        blobs,
        config.storage.key(),
        config.display.effective_offset(local_offset),
        SystemClock.now(),
    )?;
    let mut out = io::stdout().lock();

    match command {
        Command::Watch { view, ticks } => {
            let query = commands::view_query(&view, &config)?;
            watch::run(
                &board,
                &query,
                &SystemClock,
                config.display.tick_interval(),
                ticks,
                &mut out,
            )
        }
        Command::Once(command) => commands::run(command, &mut board, &config, &SystemClock, &mut out),
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|base| base.join("taskdeck"))
        .context("could not determine a data directory; pass --dir")
}

fn install_tracing() {
    // RUST_LOG overrides the default of warnings only; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
