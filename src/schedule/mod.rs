//! Timetable extraction engine.
//!
//! The university publishes one spreadsheet per faculty, course and week
//! parity. Each sheet has a header row (`День | Часы | <group> ...`)
//! followed by day blocks: a row whose first cell names a date, then one
//! row per time slot with a cell per group.
//!
//! Layers, leaves first:
//! - [`loader`] fetches a workbook and flattens its first sheet into a [`grid::Grid`]
//! - [`cache`] memoizes grids per source for a fixed freshness window
//! - [`grid`] finds the header row and group columns
//! - [`extractor`] walks a date block and collects lessons
//! - [`teacher`] runs the same walk over every group column looking for a name
//! - [`formatter`] renders results as Telegram MarkdownV2
//! - [`service`] ties the above to the source table

pub mod cache;
pub mod date;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod grid;
pub mod loader;
pub mod service;
pub mod sources;
pub mod teacher;

pub use cache::{CachedLoader, Clock, GridCache, ManualClock, SystemClock};
pub use date::{DayToken, WeekParity};
pub use error::ScheduleError;
pub use extractor::Lesson;
pub use grid::Grid;
pub use loader::{GridLoader, SpreadsheetLoader};
pub use service::{DayLookup, PrefetchReport, ScheduleService};
pub use sources::{Faculty, ScheduleSource, SourceTable};
pub use teacher::Finding;
