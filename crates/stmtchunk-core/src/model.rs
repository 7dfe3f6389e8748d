use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::fmt;
use std::ops::Range;
use std::path::Path;

use crate::error::ChunkerError;

/// Statement container formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Csv,
    Xlsx,
    Xls,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Option<FileType> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "csv" => Some(FileType::Csv),
            "xlsx" => Some(FileType::Xlsx),
            "xls" => Some(FileType::Xls),
            _ => None,
        }
    }

    /// Detect the file type from a path's extension.
    pub fn from_path(path: &Path) -> Result<FileType, ChunkerError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        FileType::from_extension(&ext).ok_or_else(|| ChunkerError::UnsupportedType {
            path: path.to_path_buf(),
            extension: if ext.is_empty() {
                "<none>".into()
            } else {
                format!(".{ext}")
            },
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Csv => "csv",
            FileType::Xlsx => "xlsx",
            FileType::Xls => "xls",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// The fixed transaction schema every recognized header is normalized onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum CanonicalField {
    Date,
    Narration,
    ChqRef,
    ValueDate,
    Withdrawal,
    Deposit,
    Balance,
}

impl CanonicalField {
    /// Canonical rendering order.
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Date,
        CanonicalField::Narration,
        CanonicalField::ChqRef,
        CanonicalField::ValueDate,
        CanonicalField::Withdrawal,
        CanonicalField::Deposit,
        CanonicalField::Balance,
    ];

    pub const AMOUNTS: [CanonicalField; 3] = [
        CanonicalField::Withdrawal,
        CanonicalField::Deposit,
        CanonicalField::Balance,
    ];

    /// Header label used in structured chunks.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Date",
            CanonicalField::Narration => "Narration",
            CanonicalField::ChqRef => "Chq/Ref",
            CanonicalField::ValueDate => "ValueDt",
            CanonicalField::Withdrawal => "Withdrawal",
            CanonicalField::Deposit => "Deposit",
            CanonicalField::Balance => "Balance",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Account header fields in first-seen order.
///
/// Keys are unique: inserting a key that is already present keeps the
/// original value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. Returns false if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.entries.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

/// A validated statement row, cells kept exactly as found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Transaction {
    pub date: String,
    pub narration: String,
    pub reference: String,
    pub value_date: String,
    pub withdrawal: String,
    pub deposit: String,
    pub balance: String,
    /// Zero-based index of the originating row in the source table.
    pub source_row: usize,
}

impl Transaction {
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Date => &self.date,
            CanonicalField::Narration => &self.narration,
            CanonicalField::ChqRef => &self.reference,
            CanonicalField::ValueDate => &self.value_date,
            CanonicalField::Withdrawal => &self.withdrawal,
            CanonicalField::Deposit => &self.deposit,
            CanonicalField::Balance => &self.balance,
        }
    }

    pub fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::Date => &mut self.date,
            CanonicalField::Narration => &mut self.narration,
            CanonicalField::ChqRef => &mut self.reference,
            CanonicalField::ValueDate => &mut self.value_date,
            CanonicalField::Withdrawal => &mut self.withdrawal,
            CanonicalField::Deposit => &mut self.deposit,
            CanonicalField::Balance => &mut self.balance,
        }
    }
}

/// A single line of extracted text, used verbatim in fallback mode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RawLine {
    /// One-based page (or worksheet) number.
    pub page: usize,
    /// Zero-based line index within the page.
    pub line_index: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(page: usize, line_index: usize, text: impl Into<String>) -> Self {
        RawLine {
            page,
            line_index,
            text: text.into(),
        }
    }
}

/// How a file was parsed. Fixed for the whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Structured {
        metadata: Metadata,
        transactions: Vec<Transaction>,
    },
    Fallback {
        metadata: Metadata,
        lines: Vec<RawLine>,
    },
}

impl ParseOutcome {
    pub fn metadata(&self) -> &Metadata {
        match self {
            ParseOutcome::Structured { metadata, .. } | ParseOutcome::Fallback { metadata, .. } => {
                metadata
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback { .. })
    }

    /// Number of windowed items: transactions or raw lines.
    pub fn item_count(&self) -> usize {
        match self {
            ParseOutcome::Structured { transactions, .. } => transactions.len(),
            ParseOutcome::Fallback { lines, .. } => lines.len(),
        }
    }
}

/// One assembled chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Covered item range; `None` for the metadata-only lead chunk.
    pub items: Option<Range<usize>>,
    /// The file's rendered metadata block, copied into every chunk.
    pub metadata_text: String,
}

/// The value handed back to callers for one processed file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProcessResult {
    metadata: Metadata,
    chunks: Vec<String>,
    fallback_used: bool,
}

impl ProcessResult {
    pub fn new(metadata: Metadata, chunks: Vec<String>, fallback_used: bool) -> Self {
        ProcessResult {
            metadata,
            chunks,
            fallback_used,
        }
    }

    /// Result for a file with no extractable content.
    pub fn empty() -> Self {
        ProcessResult::new(Metadata::new(), Vec::new(), true)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }
}
