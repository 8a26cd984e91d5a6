//! Composition of the engine: source table + cached loader + local clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, Utc};
use futures::stream::{self, StreamExt};

use super::cache::CachedLoader;
use super::date::{parse_user_date, DayToken, WeekParity};
use super::error::ScheduleError;
use super::extractor::{extract_lessons, Lesson};
use super::formatter::{
    format_date_not_found, format_day_schedule, format_group_not_found,
    format_sources_unavailable, format_teacher_schedule,
};
use super::grid::find_header_row;
use super::sources::{ScheduleSource, SourceTable};
use super::teacher::{dedup_findings, scan_grid, Finding};
use crate::utils::logging::{log_system_event, log_timeout};

pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a day lookup for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayLookup {
    /// The date was found; `lessons` may be empty.
    Lessons {
        lessons: Vec<Lesson>,
        parity: WeekParity,
        date: NaiveDate,
    },
    /// The group exists but neither parity table has the date. `parity`
    /// comes from the ISO week of `date`.
    DateNotFound { parity: WeekParity, date: NaiveDate },
    /// Documents loaded, none of them lists the group.
    GroupNotFound,
    /// Not a single document could be loaded.
    SourcesUnavailable,
}

impl DayLookup {
    pub fn render(&self, group: &str) -> String {
        match self {
            DayLookup::Lessons { lessons, parity, date } => {
                format_day_schedule(lessons, *parity, *date, group)
            }
            DayLookup::DateNotFound { parity, date } => format_date_not_found(*parity, *date, group),
            DayLookup::GroupNotFound => format_group_not_found(group),
            DayLookup::SourcesUnavailable => format_sources_unavailable(),
        }
    }

    /// The typed error behind a negative outcome, if any.
    pub fn error(&self, group: &str) -> Option<ScheduleError> {
        match self {
            DayLookup::Lessons { .. } => None,
            DayLookup::DateNotFound { date, .. } => Some(ScheduleError::DateNotFound(*date)),
            DayLookup::GroupNotFound => Some(ScheduleError::GroupNotFound(group.to_string())),
            DayLookup::SourcesUnavailable => Some(ScheduleError::SourceUnavailable {
                source_key: "*".to_string(),
                reason: "no schedule document could be loaded".to_string(),
            }),
        }
    }
}

/// Result of warming the cache for every known document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub loaded: usize,
    pub failed: usize,
}

pub struct ScheduleService {
    sources: Arc<SourceTable>,
    loader: CachedLoader,
    offset: FixedOffset,
    scan_concurrency: usize,
    source_timeout: Duration,
}

impl ScheduleService {
    pub fn new(sources: Arc<SourceTable>, loader: CachedLoader, offset: FixedOffset) -> Self {
        Self {
            sources,
            loader,
            offset,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    /// Bounds for scans over the whole source table.
    pub fn with_scan_limits(mut self, concurrency: usize, source_timeout: Duration) -> Self {
        self.scan_concurrency = concurrency.max(1);
        self.source_timeout = source_timeout;
        self
    }

    pub fn sources(&self) -> &SourceTable {
        &self.sources
    }

    /// Number of documents currently held by the cache.
    pub fn cached_documents(&self) -> usize {
        self.loader.cache().len()
    }

    /// Calendar date in the university's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Group names from the first document of this faculty/course that has
    /// a non-empty header, odd table first.
    pub async fn available_groups(&self, faculty: &str, course: u8) -> Vec<String> {
        for parity in WeekParity::ALL {
            for source in self.sources.sources(parity, faculty, course) {
                let Some(grid) = self.loader.get(source).await else {
                    continue;
                };
                match find_header_row(&grid) {
                    Some(header) if !header.groups.is_empty() => return header.group_names(),
                    Some(_) => {}
                    None => tracing::debug!("{}", ScheduleError::HeaderNotFound(source.key())),
                }
            }
        }
        Vec::new()
    }

    /// Lessons of `group` on `date`, trying the odd table before the even one.
    ///
    /// The first document that both lists the group and contains the date
    /// wins, even if the group has no lessons on it.
    pub async fn lookup_day(
        &self,
        faculty: &str,
        course: u8,
        group: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> DayLookup {
        let mut any_loaded = false;
        let mut group_seen = false;

        for parity in WeekParity::ALL {
            for source in self.sources.sources(parity, faculty, course) {
                let Some(grid) = self.loader.get(source).await else {
                    continue;
                };
                any_loaded = true;

                let Some(header) = find_header_row(&grid) else {
                    tracing::debug!("{}", ScheduleError::HeaderNotFound(source.key()));
                    continue;
                };
                let Some(column) = header.column_of(group) else {
                    continue;
                };
                group_seen = true;

                if let Some(lessons) = extract_lessons(&grid, column, date, today) {
                    return DayLookup::Lessons { lessons, parity, date };
                }
            }
        }

        if group_seen {
            DayLookup::DateNotFound {
                parity: WeekParity::of(date),
                date,
            }
        } else if any_loaded {
            DayLookup::GroupNotFound
        } else {
            DayLookup::SourcesUnavailable
        }
    }

    /// Same as [`lookup_day`](Self::lookup_day) for a keyboard day token.
    pub async fn day_schedule(
        &self,
        faculty: &str,
        course: u8,
        group: &str,
        token: DayToken,
        today: NaiveDate,
    ) -> DayLookup {
        self.lookup_day(faculty, course, group, token.resolve(today), today)
            .await
    }

    /// Rendered schedule for a raw day token such as `"Завтра"`.
    pub async fn render_day_schedule(
        &self,
        faculty: &str,
        course: u8,
        group: &str,
        token: &str,
        today: NaiveDate,
    ) -> Result<String, ScheduleError> {
        let token: DayToken = token.parse()?;
        let lookup = self.day_schedule(faculty, course, group, token, today).await;
        if let Some(e) = lookup.error(group) {
            tracing::debug!("Day lookup for {} ended with: {}", group, e);
        }
        Ok(lookup.render(group))
    }

    fn all_sources(&self) -> Vec<(WeekParity, ScheduleSource)> {
        self.sources
            .iter()
            .map(|(parity, source)| (parity, source.clone()))
            .collect()
    }

    /// Every lesson on `date` that mentions `name`, across all documents.
    ///
    /// Documents are loaded with bounded concurrency and an individual
    /// timeout; the results keep source-table order. Documents that fail or
    /// time out are skipped.
    pub async fn teacher_schedule(&self, name: &str, date: NaiveDate, today: NaiveDate) -> Vec<Finding> {
        let loader = &self.loader;
        let timeout = self.source_timeout;

        let per_source: Vec<Vec<Finding>> = stream::iter(self.all_sources())
            .map(move |(parity, source)| async move {
                match tokio::time::timeout(timeout, loader.get(&source)).await {
                    Ok(Some(grid)) => scan_grid(&grid, name, date, today, parity),
                    Ok(None) => Vec::new(),
                    Err(_) => {
                        log_timeout("teacher scan", timeout.as_secs(), Some(&source.key()));
                        Vec::new()
                    }
                }
            })
            .buffered(self.scan_concurrency)
            .collect()
            .await;

        dedup_findings(per_source.into_iter().flatten().collect())
    }

    /// Rendered teacher search for a date typed by the user.
    pub async fn render_teacher_schedule(
        &self,
        name: &str,
        date_input: &str,
        today: NaiveDate,
    ) -> Result<String, ScheduleError> {
        let date = parse_user_date(date_input, today)?;
        let findings = self.teacher_schedule(name, date, today).await;
        tracing::info!(
            "Teacher search '{}' on {}: {} finding(s)",
            name,
            date,
            findings.len()
        );
        Ok(format_teacher_schedule(name, date, &findings))
    }

    /// Loads every document of the table through the cache.
    pub async fn prefetch_all(&self) -> PrefetchReport {
        let loader = &self.loader;
        let outcomes: Vec<bool> = stream::iter(self.all_sources())
            .map(move |(_, source)| async move { loader.get(&source).await.is_some() })
            .buffer_unordered(self.scan_concurrency)
            .collect()
            .await;

        let loaded = outcomes.iter().filter(|ok| **ok).count();
        let report = PrefetchReport {
            loaded,
            failed: outcomes.len() - loaded,
        };
        let purged = self.loader.cache().purge_expired();
        log_system_event(
            "Schedule prefetch finished",
            Some(&format!(
                "{} loaded, {} failed, {} expired entries purged",
                report.loaded, report.failed, purged
            )),
        );
        report
    }
}
