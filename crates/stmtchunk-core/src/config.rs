use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ChunkerError;

pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_OVERLAP: usize = 0;

/// Minimum share of scanned rows that must validate as transactions before
/// a table is trusted as structured.
pub const DEFAULT_MIN_ACCEPTANCE_RATIO: f64 = 0.6;

/// Chunking and parse-mode settings.
///
/// Construct through [`ChunkerConfig::new`], [`load_config`] or
/// [`parse_config`] so the window invariants are checked up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkerConfig {
    /// Transactions (or raw lines in fallback mode) per chunk.
    pub chunk_size: usize,
    /// Items shared between consecutive windows. Must be below `chunk_size`.
    pub overlap: usize,
    pub min_acceptance_ratio: f64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        ChunkerConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            min_acceptance_ratio: DEFAULT_MIN_ACCEPTANCE_RATIO,
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkerError> {
        let config = ChunkerConfig {
            chunk_size,
            overlap,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_acceptance_ratio(mut self, ratio: f64) -> Result<Self, ChunkerError> {
        self.min_acceptance_ratio = ratio;
        self.validate()?;
        Ok(self)
    }

    /// Distance between consecutive window starts.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    pub fn validate(&self) -> Result<(), ChunkerError> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::InvalidConfig(
                "chunk_size must be at least 1".into(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        if !(self.min_acceptance_ratio > 0.0 && self.min_acceptance_ratio <= 1.0) {
            return Err(ChunkerError::InvalidConfig(format!(
                "min_acceptance_ratio must be in (0, 1], got {}",
                self.min_acceptance_ratio
            )));
        }
        Ok(())
    }
}

/// Load a chunker config from a JSON file. Missing fields take defaults.
pub fn load_config(path: &Path) -> Result<ChunkerConfig, ChunkerError> {
    let content = std::fs::read_to_string(path).map_err(|e| ChunkerError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a chunker config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ChunkerConfig, ChunkerError> {
    let config: ChunkerConfig = serde_json::from_str(json).map_err(|e| ChunkerError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = ChunkerConfig::default();
        assert_eq!(c.chunk_size, 5);
        assert_eq!(c.overlap, 0);
        assert_eq!(c.min_acceptance_ratio, 0.6);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn overlap_must_be_below_chunk_size() {
        assert!(ChunkerConfig::new(3, 2).is_ok());
        assert!(matches!(
            ChunkerConfig::new(3, 3),
            Err(ChunkerError::InvalidConfig(_))
        ));
        assert!(matches!(
            ChunkerConfig::new(2, 5),
            Err(ChunkerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(ChunkerConfig::new(0, 0).is_err());
    }

    #[test]
    fn ratio_out_of_range_rejected() {
        let c = ChunkerConfig::default();
        assert!(c.with_min_acceptance_ratio(0.0).is_err());
        assert!(c.with_min_acceptance_ratio(1.5).is_err());
        assert!(c.with_min_acceptance_ratio(f64::NAN).is_err());
        assert!(c.with_min_acceptance_ratio(1.0).is_ok());
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let c = parse_config(r#"{"chunk_size": 10}"#, Path::new("cfg.json")).unwrap();
        assert_eq!(c.chunk_size, 10);
        assert_eq!(c.overlap, 0);
        assert_eq!(c.min_acceptance_ratio, DEFAULT_MIN_ACCEPTANCE_RATIO);
    }

    #[test]
    fn parse_config_rejects_bad_window() {
        let err = parse_config(r#"{"chunk_size": 2, "overlap": 2}"#, Path::new("cfg.json"));
        assert!(matches!(err, Err(ChunkerError::InvalidConfig(_))));
    }

    #[test]
    fn parse_config_reports_source_path() {
        let err = parse_config("{not json", Path::new("bad.json")).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
