use std::path::PathBuf;
use stmtchunk_core::error::ChunkerError;
use stmtchunk_core::{BatchEntry, ChunkService, StatementChunker};

use super::ConfigArgs;
use crate::output;

pub fn run(
    files: Vec<PathBuf>,
    config: &ConfigArgs,
    output_file: Option<PathBuf>,
) -> Result<(), ChunkerError> {
    let service = ChunkService::new(StatementChunker::new(config.resolve()?)?);
    let entries = service.batch_process(&files);

    match output_file {
        Some(path) => {
            std::fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
            eprintln!("Report written to {}", path.display());
        }
        None => output::json::print(&entries)?,
    }

    let failed: Vec<&BatchEntry> = entries.iter().filter(|e| e.is_failed()).collect();
    eprintln!(
        "Processed {} file(s), {} failed",
        entries.len() - failed.len(),
        failed.len()
    );
    for entry in failed {
        if let BatchEntry::Failed { file_path, error } = entry {
            eprintln!("  {}: {}", file_path.display(), error);
        }
    }

    Ok(())
}
