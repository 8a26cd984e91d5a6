//! Rectangular-ish view of a timetable worksheet plus the header lookups.
//!
//! Every timetable starts its table with a row whose first two cells read
//! "День" and "Часы"; the remaining cells on that row name the groups, one
//! group per column.

/// One worksheet row. Rows may be ragged.
pub type Row = Vec<String>;

const DAY_MARKER: &str = "день";
const HOURS_MARKER: &str = "часы";

/// Cell values of the first worksheet, as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds a grid from anything string-like, mostly handy for fixtures.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|c| c.trim().is_empty()))
    }
}

/// Trimmed text of `row[col]`, or `""` when the row is too short.
pub fn cell_of(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.trim()).unwrap_or("")
}

/// Whether the row carries the day/hours markers in its first two columns.
pub fn is_header_row(row: &[String]) -> bool {
    row.len() > 2
        && cell_of(row, 0).to_lowercase().contains(DAY_MARKER)
        && cell_of(row, 1).to_lowercase().contains(HOURS_MARKER)
}

fn is_marker_cell(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(DAY_MARKER) || lower.contains(HOURS_MARKER)
}

/// The located header row together with its group columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub index: usize,
    /// `(column index, group name)` in column order, starting at column 2.
    pub groups: Vec<(usize, String)>,
}

impl HeaderRow {
    pub fn column_of(&self, group_name: &str) -> Option<usize> {
        let wanted = group_name.trim();
        self.groups
            .iter()
            .find(|(_, name)| name == wanted)
            .map(|(col, _)| *col)
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|(_, name)| name.clone()).collect()
    }
}

/// First row that looks like a timetable header.
pub fn find_header_row(grid: &Grid) -> Option<HeaderRow> {
    let (index, row) = grid
        .rows()
        .iter()
        .enumerate()
        .find(|(_, row)| is_header_row(row))?;

    let groups = row
        .iter()
        .enumerate()
        .skip(2)
        .map(|(col, cell)| (col, cell.trim()))
        .filter(|(_, name)| !name.is_empty() && !is_marker_cell(name))
        .map(|(col, name)| (col, name.to_string()))
        .collect();

    Some(HeaderRow { index, groups })
}

/// Column holding `group_name`, matched exactly after trimming.
pub fn resolve_group_column(grid: &Grid, group_name: &str) -> Option<usize> {
    find_header_row(grid)?.column_of(group_name)
}

/// Group names from the header row, in column order.
pub fn list_groups(grid: &Grid) -> Vec<String> {
    find_header_row(grid)
        .map(|header| header.group_names())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows(vec![
            vec!["Расписание занятий", "", "", ""],
            vec!["День", "Часы", "ГР-1", "ГР-11", " ГР-2 "],
            vec!["8 декабря", "08:30-10:05", "Матем.", ""],
        ])
    }

    #[test]
    fn test_header_row_found() {
        let header = find_header_row(&sample()).unwrap();
        assert_eq!(header.index, 1);
        assert_eq!(header.group_names(), vec!["ГР-1", "ГР-11", "ГР-2"]);
    }

    #[test]
    fn test_header_row_is_case_insensitive() {
        let grid = Grid::from_rows(vec![vec!["ДЕНЬ НЕДЕЛИ", "часы занятий", "А-1"]]);
        assert!(find_header_row(&grid).is_some());
    }

    #[test]
    fn test_header_locator_idempotent() {
        let grid = sample();
        assert_eq!(find_header_row(&grid), find_header_row(&grid));
    }

    #[test]
    fn test_resolve_exact_match_only() {
        let grid = sample();
        assert_eq!(resolve_group_column(&grid, "ГР-1"), Some(2));
        assert_eq!(resolve_group_column(&grid, "ГР-2"), Some(4));
        assert_eq!(resolve_group_column(&grid, "ГР"), None);
        assert_eq!(resolve_group_column(&grid, "ГР-9"), None);
    }

    #[test]
    fn test_no_header_yields_nothing() {
        let grid = Grid::from_rows(vec![vec!["a", "b", "c"]]);
        assert!(find_header_row(&grid).is_none());
        assert!(list_groups(&grid).is_empty());
    }

    #[test]
    fn test_ragged_rows_read_as_empty() {
        let grid = sample();
        assert_eq!(cell_of(&grid.rows()[2], 10), "");
        assert_eq!(cell_of(&grid.rows()[1], 4), "ГР-2");
    }

    #[test]
    fn test_whitespace_grid_is_empty() {
        assert!(Grid::from_rows(vec![vec!["  ", ""], vec!["\n"]]).is_empty());
        assert!(!sample().is_empty());
    }
}
