use std::io::Cursor;

use calamine::{Data, DataType, Reader};
use chrono::Datelike;

use crate::error::ChunkerError;
use crate::extraction::{RawDocument, RawTable, RawTableProvider};
use crate::model::RawLine;

/// Excel extraction backend for both .xlsx and legacy .xls files.
///
/// Every worksheet becomes one table; the sheet's one-based position is
/// used as its page number. Lines are the non-empty cells of each row
/// joined with tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookExtractor;

impl WorkbookExtractor {
    pub fn new() -> Self {
        WorkbookExtractor
    }
}

impl RawTableProvider for WorkbookExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, ChunkerError> {
        let cursor = Cursor::new(bytes);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| ChunkerError::Backend(format!("failed to open workbook: {e}")))?;

        let mut document = RawDocument::default();
        for (sheet_idx, (name, range)) in workbook.worksheets().into_iter().enumerate() {
            let page = sheet_idx + 1;
            let rows: Vec<Vec<String>> = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();

            for (i, row) in rows.iter().enumerate() {
                let line = row
                    .iter()
                    .filter(|c| !c.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\t");
                if !line.is_empty() {
                    document.lines.push(RawLine::new(page, i, line));
                }
            }

            tracing::debug!(sheet = %name, page, rows = rows.len(), "worksheet read");
            if !rows.is_empty() {
                document.tables.push(RawTable { page, rows });
            }
        }

        Ok(document)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

/// Render a cell the way it would read in the sheet.
///
/// Dates come out as DD/MM/YYYY so the row validator sees a date.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => format!("{:02}/{:02}/{:04}", dt.day(), dt.month(), dt.year()),
            None => format!("{cell}"),
        },
        _ => format!("{cell}"),
    }
}
