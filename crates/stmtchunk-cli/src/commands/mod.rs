pub mod batch;
pub mod inspect;
pub mod process;

use clap::Args;
use std::path::PathBuf;
use stmtchunk_core::config::{load_config, ChunkerConfig};
use stmtchunk_core::error::ChunkerError;

/// Chunking settings shared by all commands. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Transactions (or raw lines in fallback mode) per chunk [default: 5]
    #[arg(short = 'c', long)]
    pub chunk_size: Option<usize>,

    /// Items repeated between consecutive chunks [default: 0]
    #[arg(short = 'l', long)]
    pub overlap: Option<usize>,

    /// Share of rows that must validate for structured mode [default: 0.6]
    #[arg(long = "min-ratio", value_name = "RATIO")]
    pub min_ratio: Option<f64>,

    /// JSON config file with chunk_size, overlap and min_acceptance_ratio
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<ChunkerConfig, ChunkerError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ChunkerConfig::default(),
        };
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(overlap) = self.overlap {
            config.overlap = overlap;
        }
        if let Some(ratio) = self.min_ratio {
            config.min_acceptance_ratio = ratio;
        }
        config.validate()?;
        tracing::debug!(?config, "resolved chunker config");
        Ok(config)
    }
}
