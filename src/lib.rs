//! # University Schedule Bot
//!
//! A Telegram bot that registers students by faculty, course and group and
//! answers with their class schedule, read straight from the spreadsheets the
//! university publishes.
//!
//! ## Features
//! - Registration dialogue with faculty/course/group keyboards
//! - Day schedule for today, tomorrow or any weekday, odd/even week aware
//! - Teacher search across every faculty and course on a given date
//! - Cached spreadsheet loading (`.xls` and `.xlsx`, remote or local)
//! - Persistent user store with SQLite

/// Telegram dialogue, commands and keyboards
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// User store: connection, migrations and models
pub mod database;
/// Timetable loading, extraction and formatting
pub mod schedule;
/// Health endpoint and cache prefetching
pub mod services;
/// Logging, markdown, feedback and validation helpers
pub mod utils;
