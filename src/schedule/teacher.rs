//! Teacher search: every group column of one grid, tested for a name.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::date::WeekParity;
use super::extractor::{clean_cell_lines, find_date_block, timed_rows};
use super::grid::{cell_of, find_header_row, Grid};

/// One place where the searched name shows up on the requested date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finding {
    pub time: String,
    pub group: String,
    pub lines: Vec<String>,
    pub parity: WeekParity,
}

/// Case-insensitive substring test; `needle_lower` is already lower-cased.
fn mentions(cell: &str, needle_lower: &str) -> bool {
    cell.to_lowercase().contains(needle_lower)
}

/// Scans the `date` block of `grid` and returns a finding for every group
/// cell that mentions `name`.
///
/// A grid without a header row, or without the date, yields nothing. An
/// empty (or blank) name never matches.
pub fn scan_grid(
    grid: &Grid,
    name: &str,
    date: NaiveDate,
    today: NaiveDate,
    parity: WeekParity,
) -> Vec<Finding> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let Some(header) = find_header_row(grid) else {
        return Vec::new();
    };
    let Some(block) = find_date_block(grid, date, today) else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for timed in timed_rows(grid, block) {
        for (column, group) in &header.groups {
            let cell = cell_of(timed.row, *column);
            if cell.is_empty() || !mentions(cell, &needle) {
                continue;
            }
            let lines = clean_cell_lines(cell);
            if lines.is_empty() {
                continue;
            }
            findings.push(Finding {
                time: timed.time.to_string(),
                group: group.clone(),
                lines,
                parity,
            });
        }
    }
    findings
}

/// Drops repeated `(time, group, lines)` findings, keeping the first one.
pub fn dedup_findings(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|f| seen.insert((f.time.clone(), f.group.clone(), f.lines.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid() -> Grid {
        Grid::from_rows(vec![
            vec!["День", "Часы", "ГР-1", "ГР-2"],
            vec!["8 декабря", "08:30-10:05", "Матем.\nдоц. Иванов И.И.", "Физика\nПетров"],
            vec!["", "10:15-11:50", "", "Матем.\nИВАНОВ И.И."],
            vec!["9 декабря", "08:30-10:05", "История\nИванов И.И.", ""],
        ])
    }

    #[test]
    fn test_scan_finds_every_group() {
        let today = date(2025, 12, 1);
        let found = scan_grid(&grid(), "иванов", date(2025, 12, 8), today, WeekParity::Odd);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].group, "ГР-1");
        assert_eq!(found[0].time, "08:30-10:05");
        assert_eq!(found[0].lines, vec!["Матем.", "доц. Иванов И.И."]);
        assert_eq!(found[1].group, "ГР-2");
        assert_eq!(found[1].time, "10:15-11:50");
        assert!(found.iter().all(|f| f.parity == WeekParity::Odd));
    }

    #[test]
    fn test_scan_stays_inside_the_date_block() {
        let today = date(2025, 12, 1);
        let found = scan_grid(&grid(), "Иванов", date(2025, 12, 9), today, WeekParity::Even);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, vec!["История", "Иванов И.И."]);
    }

    #[test]
    fn test_blank_name_or_missing_header_finds_nothing() {
        let today = date(2025, 12, 1);
        assert!(scan_grid(&grid(), "  ", date(2025, 12, 8), today, WeekParity::Odd).is_empty());

        let headless = Grid::from_rows(vec![vec!["8 декабря", "08:30-10:05", "Иванов"]]);
        assert!(scan_grid(&headless, "Иванов", date(2025, 12, 8), today, WeekParity::Odd).is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let finding = |parity| Finding {
            time: "08:30-10:05".into(),
            group: "ГР-1".into(),
            lines: vec!["Матем.".into()],
            parity,
        };
        let other = Finding {
            group: "ГР-2".into(),
            ..finding(WeekParity::Odd)
        };
        let result = dedup_findings(vec![
            finding(WeekParity::Odd),
            other.clone(),
            finding(WeekParity::Even),
        ]);
        assert_eq!(result, vec![finding(WeekParity::Odd), other]);
    }
}
