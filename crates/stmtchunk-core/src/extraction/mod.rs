pub mod csv_file;
pub mod pdftotext;
pub mod table;
pub mod workbook;

use crate::error::ChunkerError;
use crate::model::{FileType, RawLine};

/// Rows of cells as parsed from one table-like region of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// One-based page (PDF) or worksheet (Excel) number.
    pub page: usize,
    pub rows: Vec<Vec<String>>,
}

/// Everything a backend could pull out of a file, in source order.
///
/// `lines` feed metadata extraction and fallback chunking; `tables` feed
/// column normalization and row validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pub lines: Vec<RawLine>,
    pub tables: Vec<RawTable>,
}

impl RawDocument {
    /// True when neither lines nor table rows were found.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.tables.iter().all(|t| t.rows.is_empty())
    }

    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }
}

/// Trait for raw statement extraction backends.
///
/// Implementations must be reentrant: batch processing calls them from
/// several threads at once.
pub trait RawTableProvider: Send + Sync {
    /// Extract lines and tables from the raw file bytes.
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, ChunkerError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// The backend used for each supported file type.
pub struct Extractors {
    pdf: Box<dyn RawTableProvider>,
    csv: Box<dyn RawTableProvider>,
    workbook: Box<dyn RawTableProvider>,
}

impl Extractors {
    pub fn new(
        pdf: Box<dyn RawTableProvider>,
        csv: Box<dyn RawTableProvider>,
        workbook: Box<dyn RawTableProvider>,
    ) -> Self {
        Extractors { pdf, csv, workbook }
    }

    /// Use `provider` for every file type. Handy for tests.
    pub fn uniform<P: RawTableProvider + Clone + 'static>(provider: P) -> Self {
        Extractors::new(
            Box::new(provider.clone()),
            Box::new(provider.clone()),
            Box::new(provider),
        )
    }

    /// Replace the PDF backend, keeping the others.
    pub fn with_pdf(mut self, provider: Box<dyn RawTableProvider>) -> Self {
        self.pdf = provider;
        self
    }

    pub fn for_type(&self, file_type: FileType) -> &dyn RawTableProvider {
        match file_type {
            FileType::Pdf => self.pdf.as_ref(),
            FileType::Csv => self.csv.as_ref(),
            FileType::Xlsx | FileType::Xls => self.workbook.as_ref(),
        }
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Extractors::new(
            Box::new(pdftotext::PdftotextExtractor::new()),
            Box::new(csv_file::CsvExtractor::new()),
            Box::new(workbook::WorkbookExtractor::new()),
        )
    }
}
