use std::path::Path;

use tracing::{debug, info};

use crate::chunking::assemble;
use crate::config::ChunkerConfig;
use crate::error::ChunkerError;
use crate::extraction::{Extractors, RawDocument};
use crate::model::{FileType, ProcessResult};
use crate::parsing::{decide, inspect, ParseReport};

/// Turns one statement file into metadata plus ordered chunks.
///
/// Holds no per-file state, so a single instance can serve many threads.
pub struct StatementChunker {
    config: ChunkerConfig,
    extractors: Extractors,
}

impl StatementChunker {
    /// Create a chunker with the default extraction backends.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkerError> {
        Self::with_extractors(config, Extractors::default())
    }

    pub fn with_extractors(
        config: ChunkerConfig,
        extractors: Extractors,
    ) -> Result<Self, ChunkerError> {
        config.validate()?;
        Ok(StatementChunker { config, extractors })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Process a statement file.
    ///
    /// Fails only when the file is missing, of an unsupported type, or
    /// cannot be extracted, checked in that order. Anything the parser cannot trust is chunked in
    /// fallback mode instead.
    pub fn process(&self, path: &Path) -> Result<ProcessResult, ChunkerError> {
        let bytes = read_file(path)?;
        let file_type = FileType::from_path(path)?;
        self.process_bytes(file_type, &bytes, path)
    }

    /// Process already loaded file content. `source` is used for errors
    /// and logs only.
    pub fn process_bytes(
        &self,
        file_type: FileType,
        bytes: &[u8],
        source: &Path,
    ) -> Result<ProcessResult, ChunkerError> {
        let document = self.extract(file_type, bytes, source)?;
        if document.is_empty() {
            info!(file = %source.display(), "no extractable content");
            return Ok(ProcessResult::empty());
        }

        let outcome = decide(&document, &self.config);
        let chunks = assemble(&outcome, &self.config);
        info!(
            file = %source.display(),
            %file_type,
            chunks = chunks.len(),
            fallback = outcome.is_fallback(),
            "processed statement"
        );

        let fallback_used = outcome.is_fallback();
        let metadata = outcome.metadata().clone();
        Ok(ProcessResult::new(
            metadata,
            chunks.into_iter().map(|c| c.text).collect(),
            fallback_used,
        ))
    }

    /// Report how every row of a file was classified, without chunking.
    pub fn inspect(&self, path: &Path) -> Result<ParseReport, ChunkerError> {
        let bytes = read_file(path)?;
        let file_type = FileType::from_path(path)?;
        let document = self.extract(file_type, &bytes, path)?;
        Ok(inspect(&document, &self.config))
    }

    fn extract(
        &self,
        file_type: FileType,
        bytes: &[u8],
        source: &Path,
    ) -> Result<RawDocument, ChunkerError> {
        let backend = self.extractors.for_type(file_type);
        debug!(file = %source.display(), backend = backend.backend_name(), "extracting");
        let document = backend
            .extract(bytes)
            .map_err(|e| ChunkerError::extraction(source, e))?;
        debug!(
            lines = document.lines.len(),
            tables = document.tables.len(),
            rows = document.row_count(),
            "extracted"
        );
        Ok(document)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ChunkerError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ChunkerError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ChunkerError::Io(e),
    })
}
