use crate::error::ChunkerError;
use crate::extraction::{RawDocument, RawTable, RawTableProvider};
use crate::model::RawLine;

/// CSV extraction backend.
///
/// The whole file is one table on page 1. Records may have any number of
/// fields; rows with surplus fields are repaired later by the decider.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        CsvExtractor
    }
}

impl RawTableProvider for CsvExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, ChunkerError> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_start_matches('\u{feff}');

        let lines: Vec<RawLine> = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| RawLine::new(1, i, l))
            .collect();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| ChunkerError::Backend(format!("malformed CSV: {e}")))?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let tables = if rows.is_empty() {
            Vec::new()
        } else {
            vec![RawTable { page: 1, rows }]
        };

        Ok(RawDocument { lines, tables })
    }

    fn backend_name(&self) -> &str {
        "csv"
    }
}
