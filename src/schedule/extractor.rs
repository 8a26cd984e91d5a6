//! Date-block extraction: find the rows of one calendar day and read the
//! lessons of a group column out of them.
//!
//! A date block starts at the first row below the header whose first cell
//! parses to the target date (the anchor, included) and runs until a row whose first cell
//! parses to a *different* date, a repeated header row, or the end of the
//! sheet. Time labels live in column 1 and are often merged vertically,
//! which arrives as blanks below the first row; the last non-blank label
//! is carried down through those blanks.

use std::collections::HashSet;
use std::ops::Range;

use chrono::NaiveDate;

use super::date::parse_russian_date;
use super::grid::{cell_of, find_header_row, is_header_row, Grid, Row};

const TIME_COLUMN: usize = 1;
const DATE_COLUMN: usize = 0;

/// One time slot and what happens in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lesson {
    pub time: String,
    pub lines: Vec<String>,
}

impl Lesson {
    pub fn new(time: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            time: time.into(),
            lines,
        }
    }
}

/// Splits a subject cell into display lines: one per line break, leading
/// dash or bullet removed, blank lines dropped.
pub fn clean_cell_lines(cell: &str) -> Vec<String> {
    cell.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '–', '—', '•'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Date denoted by the first cell of `row`, if any.
pub fn row_date(row: &[String], today: NaiveDate) -> Option<NaiveDate> {
    let text = cell_of(row, DATE_COLUMN);
    if text.is_empty() {
        return None;
    }
    parse_russian_date(text, today)
}

/// Index of the first row below the header whose date cell matches `date`.
///
/// Sheet titles above the header ("Расписание с 8 декабря по 13 декабря")
/// carry dates too and must not anchor a block. A grid without a header
/// has no anchor.
pub fn find_anchor_row(grid: &Grid, date: NaiveDate, today: NaiveDate) -> Option<usize> {
    let first = find_header_row(grid)?.index + 1;
    grid.rows()
        .iter()
        .enumerate()
        .skip(first)
        .find(|(_, row)| row_date(row, today) == Some(date))
        .map(|(index, _)| index)
}

fn ends_block(row: &[String], anchor: NaiveDate, today: NaiveDate) -> bool {
    if is_header_row(row) {
        return true;
    }
    matches!(row_date(row, today), Some(d) if d != anchor)
}

/// Row range of the block for `date`, anchor row included.
pub fn find_date_block(grid: &Grid, date: NaiveDate, today: NaiveDate) -> Option<Range<usize>> {
    let start = find_anchor_row(grid, date, today)?;
    let end = grid.rows()[start + 1..]
        .iter()
        .position(|row| ends_block(row, date, today))
        .map(|offset| start + 1 + offset)
        .unwrap_or(grid.len());
    Some(start..end)
}

/// A row inside a block together with the time label in force for it.
#[derive(Debug, Clone, Copy)]
pub struct TimedRow<'g> {
    pub time: &'g str,
    pub row: &'g Row,
}

/// Rows of `block` that sit under a known time label. Rows before the first
/// label of the block are skipped.
pub fn timed_rows(grid: &Grid, block: Range<usize>) -> impl Iterator<Item = TimedRow<'_>> {
    grid.rows()[block]
        .iter()
        .scan(None::<&str>, |current, row| {
            let label = cell_of(row, TIME_COLUMN);
            if !label.is_empty() {
                *current = Some(label);
            }
            Some(current.map(|time| TimedRow { time, row }))
        })
        .flatten()
}

/// Accumulates lessons in walk order with one entry per time label.
///
/// Content found again under a label it was already recorded for is
/// ignored; new content under an existing label is appended to it.
#[derive(Debug, Default)]
pub struct LessonMerger {
    lessons: Vec<Lesson>,
    seen: HashSet<(String, Vec<String>)>,
}

impl LessonMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: &str, lines: Vec<String>) {
        if lines.is_empty() || !self.seen.insert((time.to_string(), lines.clone())) {
            return;
        }
        match self.lessons.iter_mut().find(|l| l.time == time) {
            Some(lesson) => lesson.lines.extend(lines),
            None => self.lessons.push(Lesson::new(time, lines)),
        }
    }

    pub fn into_lessons(self) -> Vec<Lesson> {
        self.lessons
    }
}

/// Lessons of `column` on `date`.
///
/// `None` means the date is not in this grid at all; `Some(vec![])` means
/// the date is there but the group has nothing on it.
pub fn extract_lessons(
    grid: &Grid,
    column: usize,
    date: NaiveDate,
    today: NaiveDate,
) -> Option<Vec<Lesson>> {
    let block = find_date_block(grid, date, today)?;
    let mut merger = LessonMerger::new();
    for timed in timed_rows(grid, block) {
        let cell = cell_of(timed.row, column);
        if !cell.is_empty() {
            merger.push(timed.time, clean_cell_lines(cell));
        }
    }
    Some(merger.into_lessons())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week_grid() -> Grid {
        Grid::from_rows(vec![
            vec!["День", "Часы", "ГР-1", "ГР-2"],
            vec!["8 декабря понедельник", "08:30-10:05", "Матем.\n- лекция", ""],
            vec!["", "", "ауд. 101", ""],
            vec!["", "10:15-11:50", "", "Физика"],
            vec!["9 декабря вторник", "08:30-10:05", "История", ""],
            vec!["", "10:15-11:50", "Химия", ""],
        ])
    }

    #[test]
    fn test_clean_cell_lines() {
        assert_eq!(clean_cell_lines("Матем.\n- лекция"), vec!["Матем.", "лекция"]);
        assert_eq!(clean_cell_lines("  - Физика  \r\n\n • доц. Иванов"), vec!["Физика", "доц. Иванов"]);
        assert!(clean_cell_lines("   ").is_empty());
        assert!(clean_cell_lines(" - \n-").is_empty());
    }

    #[test]
    fn test_block_bounds() {
        let grid = week_grid();
        let today = date(2025, 12, 1);
        assert_eq!(find_date_block(&grid, date(2025, 12, 8), today), Some(1..4));
        assert_eq!(find_date_block(&grid, date(2025, 12, 9), today), Some(4..6));
        assert_eq!(find_date_block(&grid, date(2025, 12, 10), today), None);
    }

    #[test]
    fn test_time_label_carries_through_merged_cells() {
        let grid = week_grid();
        let lessons = extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 1)).unwrap();
        assert_eq!(
            lessons,
            vec![Lesson::new(
                "08:30-10:05",
                vec!["Матем.".into(), "лекция".into(), "ауд. 101".into()]
            )]
        );
    }

    #[test]
    fn test_other_column_reads_its_own_cells() {
        let grid = week_grid();
        let lessons = extract_lessons(&grid, 3, date(2025, 12, 8), date(2025, 12, 1)).unwrap();
        assert_eq!(lessons, vec![Lesson::new("10:15-11:50", vec!["Физика".into()])]);
    }

    #[test]
    fn test_found_date_without_lessons_is_empty_not_none() {
        let grid = week_grid();
        let lessons = extract_lessons(&grid, 3, date(2025, 12, 9), date(2025, 12, 1));
        assert_eq!(lessons, Some(vec![]));
    }

    #[test]
    fn test_repeated_date_cell_does_not_end_block() {
        let grid = Grid::from_rows(vec![
            vec!["День", "Часы", "ГР-1"],
            vec!["8 декабря", "08:30-10:05", "Матем."],
            vec!["8 декабря", "10:15-11:50", "Физика"],
            vec!["9 декабря", "08:30-10:05", "История"],
        ]);
        let lessons = extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 1)).unwrap();
        assert_eq!(lessons.len(), 2);
    }

    #[test]
    fn test_header_row_ends_block() {
        let grid = Grid::from_rows(vec![
            vec!["День", "Часы", "ГР-1"],
            vec!["8 декабря", "08:30-10:05", "Матем."],
            vec!["День", "Часы", "ГР-1"],
            vec!["", "10:15-11:50", "Чужая пара"],
        ]);
        let lessons = extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 1)).unwrap();
        assert_eq!(lessons, vec![Lesson::new("08:30-10:05", vec!["Матем.".into()])]);
    }

    #[test]
    fn test_rows_before_first_time_label_are_ignored() {
        let grid = Grid::from_rows(vec![
            vec!["День", "Часы", "ГР-1"],
            vec!["8 декабря", "", "Без времени"],
            vec!["", "08:30-10:05", "Матем."],
        ]);
        let lessons = extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 1)).unwrap();
        assert_eq!(lessons, vec![Lesson::new("08:30-10:05", vec!["Матем.".into()])]);
    }

    #[test]
    fn test_dated_title_above_header_is_not_an_anchor() {
        let grid = Grid::from_rows(vec![
            vec!["Расписание занятий с 8 декабря по 13 декабря", "", "", ""],
            vec!["День", "Часы", "ГР-1", "ГР-2"],
            vec!["8 декабря", "08:30-10:05", "Матем.", ""],
        ]);
        assert_eq!(find_anchor_row(&grid, date(2025, 12, 8), date(2025, 12, 8)), Some(2));
        let lessons = extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 8)).unwrap();
        assert_eq!(lessons, vec![Lesson::new("08:30-10:05", vec!["Матем.".into()])]);
    }

    #[test]
    fn test_grid_without_header_has_no_anchor() {
        let grid = Grid::from_rows(vec![vec!["8 декабря", "08:30-10:05", "Матем."]]);
        assert_eq!(find_anchor_row(&grid, date(2025, 12, 8), date(2025, 12, 1)), None);
        assert_eq!(extract_lessons(&grid, 2, date(2025, 12, 8), date(2025, 12, 1)), None);
    }

    #[test]
    fn test_merger_suppresses_identical_content() {
        let mut merger = LessonMerger::new();
        merger.push("08:30-10:05", vec!["Матем.".into()]);
        merger.push("08:30-10:05", vec!["Матем.".into()]);
        merger.push("08:30-10:05", vec!["ауд. 101".into()]);
        merger.push("10:15-11:50", vec![]);
        assert_eq!(
            merger.into_lessons(),
            vec![Lesson::new("08:30-10:05", vec!["Матем.".into(), "ауд. 101".into()])]
        );
    }
}
