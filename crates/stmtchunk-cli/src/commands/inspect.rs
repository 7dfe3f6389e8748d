use std::path::PathBuf;
use stmtchunk_core::error::ChunkerError;
use stmtchunk_core::StatementChunker;

use super::ConfigArgs;
use crate::output;

pub fn run(input_file: PathBuf, config: &ConfigArgs, output_format: &str) -> Result<(), ChunkerError> {
    let chunker = StatementChunker::new(config.resolve()?)?;
    let report = chunker.inspect(&input_file)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => println!("{}", output::table::format_inspect(&report)),
    }

    Ok(())
}
