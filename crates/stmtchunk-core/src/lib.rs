pub mod chunker;
pub mod chunking;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod service;

use std::path::Path;

pub use chunker::StatementChunker;
pub use config::{load_config, ChunkerConfig};
pub use error::ChunkerError;
pub use extraction::{Extractors, RawDocument, RawTable, RawTableProvider};
pub use model::{FileType, Metadata, ProcessResult, RawLine, Transaction};
pub use service::{BatchEntry, ChunkService, FileInfo, FileReport};

/// Main API entry point: chunk one statement file with the default
/// extraction backends.
///
/// Files whose transaction table cannot be trusted are chunked as raw text
/// (`fallback_used = true`) rather than rejected.
pub fn process_file(path: &Path, config: ChunkerConfig) -> Result<ProcessResult, ChunkerError> {
    StatementChunker::new(config)?.process(path)
}
