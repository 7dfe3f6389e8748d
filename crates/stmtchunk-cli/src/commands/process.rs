use std::path::PathBuf;
use stmtchunk_core::error::ChunkerError;
use stmtchunk_core::export::to_markdown;
use stmtchunk_core::{ChunkService, StatementChunker};

use super::ConfigArgs;
use crate::output;

pub fn run(
    input_file: PathBuf,
    config: &ConfigArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
    markdown_file: Option<PathBuf>,
) -> Result<(), ChunkerError> {
    let service = ChunkService::new(StatementChunker::new(config.resolve()?)?);
    let report = service.process_file(&input_file)?;

    if let Some(path) = &markdown_file {
        std::fs::write(path, to_markdown(&report.result))?;
        eprintln!("Markdown written to {}", path.display());
    }

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "{} chunk(s) ({}), written to {}",
                report.file_info.num_chunks,
                output::table::mode_label(report.result.fallback_used()),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&report)?,
            _ => println!("{}", output::table::format_report(&report)),
        },
    }

    Ok(())
}
