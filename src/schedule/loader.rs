//! Fetching timetable workbooks and flattening their timetable sheet into a [`Grid`].

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use calamine::{
    open_workbook_from_rs, Data, Range, Reader, Sheet, SheetType, SheetVisible, Xls, Xlsx,
};
use chrono::{Datelike, Timelike};

use super::date::RUS_MONTHS;
use super::error::ScheduleError;
use super::grid::Grid;
use super::sources::ScheduleSource;

/// Produces a grid for a schedule source.
#[async_trait]
pub trait GridLoader: Send + Sync {
    async fn load(&self, source: &ScheduleSource) -> Result<Grid, ScheduleError>;
}

/// The two spreadsheet containers timetables are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Legacy binary `.xls` (OLE compound document).
    Xls,
    /// Office Open XML `.xlsx` (zip).
    Xlsx,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

impl SheetFormat {
    /// Format implied by the address extension, ignoring any query string.
    pub fn from_address(address: &str) -> Option<Self> {
        let path = address.split(['?', '#']).next().unwrap_or(address);
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(SheetFormat::Xlsx),
            "xls" => Some(SheetFormat::Xls),
            _ => None,
        }
    }

    /// Format implied by the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            Some(SheetFormat::Xlsx)
        } else if bytes.starts_with(OLE_MAGIC) {
            Some(SheetFormat::Xls)
        } else {
            None
        }
    }

    /// Content wins over the extension: servers are known to publish
    /// `.xls` links that serve zip workbooks.
    pub fn detect(address: &str, bytes: &[u8]) -> Option<Self> {
        Self::sniff(bytes).or_else(|| Self::from_address(address))
    }
}

/// Display string for one cell.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            // time-of-day only
            Some(t) if dt.as_f64() < 1.0 => format!("{:02}:{:02}", t.hour(), t.minute()),
            Some(d) => format!("{} {}", d.day(), RUS_MONTHS[d.month0() as usize]),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Converts a worksheet range into a grid, keeping absolute column
/// positions when the used range does not start at column A.
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let lead = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let rows = range
        .rows()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(lead)
                .chain(row.iter().map(cell_to_string))
                .collect()
        })
        .collect();
    Grid::new(rows)
}

/// Index of the sheet to read: the first visible worksheet, else sheet 0.
///
/// calamine does not report which tab was active when the file was saved.
/// Excel never leaves a hidden sheet active, so skipping hidden tabs lands
/// on the sheet a reader would see in the usual single-timetable workbook.
pub fn timetable_sheet_index(sheets: &[Sheet]) -> usize {
    sheets
        .iter()
        .position(|sheet| {
            sheet.typ == SheetType::WorkSheet && sheet.visible == SheetVisible::Visible
        })
        .unwrap_or(0)
}

fn timetable_sheet<RS, R>(mut workbook: R, source_key: &str) -> Result<Grid, ScheduleError>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
{
    let index = timetable_sheet_index(workbook.sheets_metadata());
    let range = workbook
        .worksheet_range_at(index)
        .ok_or_else(|| ScheduleError::unparseable(source_key, "workbook has no sheets"))?
        .map_err(|e| ScheduleError::unparseable(source_key, format!("{e:?}")))?;
    Ok(range_to_grid(&range))
}

/// Parses workbook bytes, reading the sheet chosen by
/// [`timetable_sheet_index`]. A sheet with no text is reported as
/// unparseable.
pub fn parse_workbook(bytes: &[u8], format: SheetFormat, source_key: &str) -> Result<Grid, ScheduleError> {
    let cursor = Cursor::new(bytes);
    let grid = match format {
        SheetFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(cursor)
                .map_err(|e| ScheduleError::unparseable(source_key, e))?;
            timetable_sheet(workbook, source_key)?
        }
        SheetFormat::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(cursor)
                .map_err(|e| ScheduleError::unparseable(source_key, e))?;
            timetable_sheet(workbook, source_key)?
        }
    };

    if grid.is_empty() {
        return Err(ScheduleError::unparseable(source_key, "no rows extracted"));
    }
    Ok(grid)
}

/// Loads workbooks over HTTP or from disk.
#[derive(Clone)]
pub struct SpreadsheetLoader {
    client: reqwest::Client,
}

impl SpreadsheetLoader {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("uni-schedule-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, source: &ScheduleSource) -> Result<Vec<u8>, ScheduleError> {
        let key = source.key();
        match source {
            ScheduleSource::Remote(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ScheduleError::unavailable(&key, e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScheduleError::unavailable(&key, format!("HTTP status {status}")));
                }
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| ScheduleError::unavailable(&key, e))?;
                Ok(body.to_vec())
            }
            ScheduleSource::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ScheduleError::unavailable(&key, e)),
        }
    }
}

#[async_trait]
impl GridLoader for SpreadsheetLoader {
    async fn load(&self, source: &ScheduleSource) -> Result<Grid, ScheduleError> {
        let key = source.key();
        let bytes = self.fetch(source).await?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), key);

        let format = SheetFormat::detect(&key, &bytes)
            .ok_or_else(|| ScheduleError::unparseable(&key, "unknown spreadsheet format"))?;

        // calamine is synchronous; keep the runtime responsive for big workbooks
        let parse_key = key.clone();
        tokio::task::spawn_blocking(move || parse_workbook(&bytes, format, &parse_key))
            .await
            .map_err(|e| ScheduleError::unparseable(&key, e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_address() {
        assert_eq!(SheetFormat::from_address("https://x.ru/a/МФ 1.xls"), Some(SheetFormat::Xls));
        assert_eq!(SheetFormat::from_address("https://x.ru/a.XLSX?v=3"), Some(SheetFormat::Xlsx));
        assert_eq!(SheetFormat::from_address("schedules/a.pdf"), None);
        assert_eq!(SheetFormat::from_address("no-extension"), None);
    }

    #[test]
    fn test_format_sniffing_beats_extension() {
        assert_eq!(SheetFormat::detect("a.xls", b"PK\x03\x04rest"), Some(SheetFormat::Xlsx));
        assert_eq!(
            SheetFormat::detect("a.bin", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1]),
            Some(SheetFormat::Xls)
        );
        assert_eq!(SheetFormat::detect("a.xlsx", b"<html>"), Some(SheetFormat::Xlsx));
        assert_eq!(SheetFormat::detect("a", b"<html>"), None);
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String("Матем.\n- лекция".into())), "Матем.\n- лекция");
    }

    fn sheet(name: &str, typ: SheetType, visible: SheetVisible) -> Sheet {
        Sheet {
            name: name.into(),
            typ,
            visible,
        }
    }

    #[test]
    fn test_hidden_and_chart_sheets_are_skipped() {
        let sheets = vec![
            sheet("Архив", SheetType::WorkSheet, SheetVisible::Hidden),
            sheet("Диаграмма", SheetType::ChartSheet, SheetVisible::Visible),
            sheet("Расписание", SheetType::WorkSheet, SheetVisible::Visible),
        ];
        assert_eq!(timetable_sheet_index(&sheets), 2);
        assert_eq!(timetable_sheet_index(&sheets[2..]), 0);
        assert_eq!(timetable_sheet_index(&sheets[..1]), 0);
        assert_eq!(timetable_sheet_index(&[]), 0);
    }

    #[test]
    fn test_garbage_bytes_are_unparseable() {
        let result = parse_workbook(b"PK\x03\x04 definitely not a zip", SheetFormat::Xlsx, "bad.xlsx");
        assert!(matches!(result, Err(ScheduleError::UnparseableDocument { .. })));
    }
}
