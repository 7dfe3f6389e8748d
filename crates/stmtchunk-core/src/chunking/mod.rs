//! Windowing of parsed items into chunks and their text rendering.
//!
//! Structured outcomes yield a metadata-only lead chunk followed by one
//! chunk per transaction window. Fallback outcomes yield one chunk per
//! raw-line window, each carrying the metadata block.

pub mod format;
pub mod window;

use tracing::debug;

use crate::config::ChunkerConfig;
use crate::model::{Chunk, ParseOutcome};

pub use window::windows;

/// Assemble the chunks of one file.
pub fn assemble(outcome: &ParseOutcome, config: &ChunkerConfig) -> Vec<Chunk> {
    let metadata_text = format::metadata_block(outcome.metadata());
    let ranges = windows(outcome.item_count(), config.chunk_size, config.overlap);
    debug!(
        items = outcome.item_count(),
        windows = ranges.len(),
        fallback = outcome.is_fallback(),
        "assembling chunks"
    );

    match outcome {
        ParseOutcome::Structured { transactions, .. } => {
            let mut chunks = Vec::with_capacity(ranges.len() + 1);
            chunks.push(Chunk {
                text: metadata_text.clone(),
                items: None,
                metadata_text: metadata_text.clone(),
            });
            for range in ranges {
                let body = format::structured_block(transactions, range.clone());
                chunks.push(Chunk {
                    text: format::join_parts(&[&metadata_text, &body]),
                    items: Some(range),
                    metadata_text: metadata_text.clone(),
                });
            }
            chunks
        }
        ParseOutcome::Fallback { lines, .. } => ranges
            .into_iter()
            .map(|range| {
                let body = format::fallback_block(&lines[range.clone()]);
                Chunk {
                    text: format::join_parts(&[&metadata_text, &body]),
                    items: Some(range),
                    metadata_text: metadata_text.clone(),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, RawLine, Transaction};

    fn metadata() -> Metadata {
        [("Account Holder", "John Doe")].into_iter().collect()
    }

    fn structured(n: usize) -> ParseOutcome {
        ParseOutcome::Structured {
            metadata: metadata(),
            transactions: (0..n)
                .map(|i| Transaction {
                    date: format!("0{}/04/2024", i + 1),
                    narration: format!("T{i}"),
                    source_row: i + 1,
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_structured_lead_chunk_is_metadata_only() {
        let chunks = assemble(&structured(5), &ChunkerConfig::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Account Holder: John Doe");
        assert_eq!(chunks[0].items, None);
        assert_eq!(chunks[1].items, Some(0..5));
        assert!(chunks[1].text.starts_with("Account Holder: John Doe\nheaders[7]:"));
        assert!(chunks[1].text.ends_with("num_transactions: 5"));
    }

    #[test]
    fn test_structured_windows() {
        let config = ChunkerConfig::new(2, 0).unwrap();
        let chunks = assemble(&structured(5), &config);
        let items: Vec<_> = chunks.iter().map(|c| c.items.clone()).collect();
        assert_eq!(items, vec![None, Some(0..2), Some(2..4), Some(4..5)]);
        assert!(chunks[3].text.contains("transaction_indices[2]: 4,4"));
        assert!(chunks[3].text.contains("row_indices[2]: 5,5"));
    }

    #[test]
    fn test_fallback_has_no_lead_chunk() {
        let outcome = ParseOutcome::Fallback {
            metadata: metadata(),
            lines: (0..3).map(|i| RawLine::new(1, i, format!("line {i}"))).collect(),
        };
        let chunks = assemble(&outcome, &ChunkerConfig::new(2, 0).unwrap());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Account Holder: John Doe\nline 0\nline 1");
        assert_eq!(chunks[1].text, "Account Holder: John Doe\nline 2");
    }

    #[test]
    fn test_fallback_without_metadata() {
        let outcome = ParseOutcome::Fallback {
            metadata: Metadata::new(),
            lines: vec![RawLine::new(1, 0, "only line")],
        };
        let chunks = assemble(&outcome, &ChunkerConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "only line");
        assert_eq!(chunks[0].metadata_text, "");
    }

    #[test]
    fn test_metadata_text_identical_across_chunks() {
        let chunks = assemble(&structured(9), &ChunkerConfig::new(2, 1).unwrap());
        assert!(chunks.iter().all(|c| c.metadata_text == chunks[0].metadata_text));
        assert!(chunks.iter().all(|c| c.text.starts_with(&c.metadata_text)));
    }
}
