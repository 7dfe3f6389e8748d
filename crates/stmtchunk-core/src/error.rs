use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChunkerError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported file type '{extension}' for {}. Use .pdf, .csv, .xlsx or .xls", path.display())]
    UnsupportedType { path: PathBuf, extension: String },

    #[error("extraction failed for {}: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<ChunkerError>,
    },

    #[error("{0}")]
    Backend(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChunkerError {
    /// Wrap a backend failure with the path of the file being extracted.
    pub fn extraction(path: impl Into<PathBuf>, source: ChunkerError) -> Self {
        ChunkerError::Extraction {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
