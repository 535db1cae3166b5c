//! Application layer logic for taskdeck.
//!
//! This crate provides the persisted task board, configuration, and the
//! display summaries shared by front-ends.

pub mod config;
pub mod recent;
pub mod summary;
pub mod task_board;

// Re-exports for convenience
pub use config::{DisplayConfig, ProjectConfig, StorageConfig, parse_offset};
pub use recent::RecentlyAdded;
pub use summary::{BoardSummary, EMPTY_VIEW_MESSAGE, StatusIndicator, TaskRow, rows};
pub use task_board::{BoardError, BoardResult, TaskBoard, ViewQuery};
