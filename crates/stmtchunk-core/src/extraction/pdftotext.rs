use crate::error::ChunkerError;
use crate::extraction::table::{reconstruct_tables, PageText};
use crate::extraction::{RawDocument, RawTableProvider};
use crate::model::RawLine;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so table columns stay aligned; tables are
/// rebuilt from the column positions of the transaction header.
#[derive(Debug, Clone, Copy)]
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTableProvider for PdftotextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, ChunkerError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| ChunkerError::Backend(e.to_string()))?;
        tmpfile
            .write_all(bytes)
            .map_err(|e| ChunkerError::Backend(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ChunkerError::PdftotextNotFound
                } else {
                    ChunkerError::Backend(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ChunkerError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let document = document_from_layout(&text);
        tracing::debug!(
            lines = document.lines.len(),
            tables = document.tables.len(),
            rows = document.row_count(),
            "pdftotext layout parsed"
        );
        Ok(document)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Turn `pdftotext -layout` output into lines and reconstructed tables.
///
/// Pages are separated by form feeds. Blank lines are dropped from the
/// line list but keep their index so positions match the page text.
/// Lines are kept verbatim; only table reconstruction sees them trimmed.
pub fn document_from_layout(text: &str) -> RawDocument {
    let pages: Vec<(usize, Vec<&str>)> = text
        .split('\x0c')
        .enumerate()
        .map(|(i, page_text)| (i + 1, page_text.lines().collect::<Vec<_>>()))
        .filter(|(_, lines)| lines.iter().any(|l| !l.trim().is_empty()))
        .collect();

    let lines = pages
        .iter()
        .flat_map(|(page, page_lines)| {
            page_lines
                .iter()
                .enumerate()
                .filter(|(_, l)| !l.trim().is_empty())
                .map(move |(i, l)| RawLine::new(*page, i, *l))
        })
        .collect();

    let layout_pages: Vec<PageText> = pages
        .iter()
        .map(|(page, page_lines)| PageText {
            page_number: *page,
            lines: page_lines.iter().map(|l| l.trim_end().to_string()).collect(),
        })
        .collect();

    RawDocument {
        lines,
        tables: reconstruct_tables(&layout_pages),
    }
}
