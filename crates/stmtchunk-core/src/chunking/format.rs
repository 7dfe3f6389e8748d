use std::fmt::Write;
use std::ops::Range;

use crate::model::{CanonicalField, Metadata, RawLine, Transaction};

/// Render metadata as `key: value` lines. Empty metadata renders as "".
pub fn metadata_block(metadata: &Metadata) -> String {
    metadata
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a window of transactions as a structured table block.
///
/// `range` holds the transaction indices of the window and must be
/// non-empty and within `transactions`.
pub fn structured_block(transactions: &[Transaction], range: Range<usize>) -> String {
    let window = &transactions[range.clone()];
    let width = CanonicalField::ALL.len();
    let labels: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.label()).collect();

    let mut out = String::new();
    let _ = writeln!(out, "headers[{width}]: {}", labels.join(","));
    let _ = writeln!(out, "rows[{}]:", window.len());
    for txn in window {
        let cells: Vec<String> = CanonicalField::ALL
            .iter()
            .map(|f| quote(txn.field(*f)))
            .collect();
        let _ = writeln!(out, "  - [{width},]: {}", cells.join(","));
    }

    let first_row = window.first().map_or(0, |t| t.source_row);
    let last_row = window.last().map_or(0, |t| t.source_row);
    let _ = writeln!(
        out,
        "transaction_indices[2]: {},{}",
        range.start,
        range.end.saturating_sub(1)
    );
    let _ = writeln!(out, "row_indices[2]: {first_row},{last_row}");
    let _ = write!(out, "num_transactions: {}", window.len());
    out
}

/// Raw lines of a fallback window, verbatim.
pub fn fallback_block(lines: &[RawLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join chunk parts with newlines, skipping empty ones.
pub fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(cell: &str) -> String {
    serde_json::Value::String(cell.to_string()).to_string()
}
