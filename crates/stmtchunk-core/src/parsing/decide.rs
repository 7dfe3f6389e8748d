use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::ChunkerConfig;
use crate::extraction::RawDocument;
use crate::model::{CanonicalField, ParseOutcome, Transaction};
use crate::parsing::columns::ColumnMap;
use crate::parsing::metadata::extract_metadata;
use crate::parsing::rows::{build_transaction, is_continuation, validate_row, RowVerdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    Structured,
    Fallback,
}

/// Counters behind the structured/fallback decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParseStats {
    pub header_found: bool,
    pub validated_count: usize,
    /// Non-empty rows scanned after the header, continuations excluded.
    pub total_candidate_count: usize,
    pub continuation_count: usize,
}

impl ParseStats {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.total_candidate_count == 0 {
            0.0
        } else {
            self.validated_count as f64 / self.total_candidate_count as f64
        }
    }

    pub fn mode(&self, config: &ChunkerConfig) -> ParseMode {
        if self.header_found
            && self.validated_count >= 1
            && self.acceptance_ratio() >= config.min_acceptance_ratio
        {
            ParseMode::Structured
        } else {
            ParseMode::Fallback
        }
    }
}

/// How one physical row was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    PreHeader,
    Header,
    Continuation,
    Validated(RowVerdict),
}

#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub table: usize,
    pub row: usize,
    pub cells: Vec<String>,
    pub status: RowStatus,
}

/// Diagnostics of one parse, for the `inspect` command.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub header: Option<Vec<String>>,
    pub column_map: Vec<(CanonicalField, usize)>,
    pub rows: Vec<RowReport>,
    pub stats: ParseStats,
    pub acceptance_ratio: f64,
    pub mode: ParseMode,
}

struct Scan {
    map: Option<ColumnMap>,
    transactions: Vec<Transaction>,
    stats: ParseStats,
    rows: Vec<RowReport>,
}

/// Choose the parse mode for a whole file and build its outcome.
pub fn decide(document: &RawDocument, config: &ChunkerConfig) -> ParseOutcome {
    let metadata = extract_metadata(&document.lines);
    let scan = scan_tables(document);
    let stats = scan.stats;

    match stats.mode(config) {
        ParseMode::Structured => {
            info!(
                transactions = stats.validated_count,
                candidates = stats.total_candidate_count,
                ratio = stats.acceptance_ratio(),
                "structured parse"
            );
            ParseOutcome::Structured {
                metadata,
                transactions: scan.transactions,
            }
        }
        ParseMode::Fallback => {
            warn!(
                header_found = stats.header_found,
                validated = stats.validated_count,
                candidates = stats.total_candidate_count,
                ratio = stats.acceptance_ratio(),
                min_ratio = config.min_acceptance_ratio,
                "low-confidence parse, falling back to raw lines"
            );
            ParseOutcome::Fallback {
                metadata,
                lines: document.lines.clone(),
            }
        }
    }
}

/// Run the same scan as [`decide`] and report every row's classification.
pub fn inspect(document: &RawDocument, config: &ChunkerConfig) -> ParseReport {
    let scan = scan_tables(document);
    ParseReport {
        header: scan.map.as_ref().map(|m| m.header().to_vec()),
        column_map: scan.map.as_ref().map(|m| m.mapped().collect()).unwrap_or_default(),
        acceptance_ratio: scan.stats.acceptance_ratio(),
        mode: scan.stats.mode(config),
        stats: scan.stats,
        rows: scan.rows,
    }
}

fn scan_tables(document: &RawDocument) -> Scan {
    let mut scan = Scan {
        map: None,
        transactions: Vec::new(),
        stats: ParseStats::default(),
        rows: Vec::new(),
    };
    let mut source_row = 0;
    let mut prev_accepted = false;

    for (table_idx, table) in document.tables.iter().enumerate() {
        debug!(table = table_idx, page = table.page, rows = table.rows.len(), "scanning table");

        for (row_idx, raw) in table.rows.iter().enumerate() {
            let row_number = source_row + row_idx;

            let Some(map) = scan.map.as_ref() else {
                let status = match ColumnMap::from_header_row(raw) {
                    Some(map) => {
                        debug!(header = ?map.header(), row = row_number, "matched transaction header");
                        scan.map = Some(map);
                        scan.stats.header_found = true;
                        RowStatus::Header
                    }
                    None => RowStatus::PreHeader,
                };
                scan.rows.push(RowReport {
                    table: table_idx,
                    row: row_number,
                    cells: raw.clone(),
                    status,
                });
                continue;
            };

            for physical in split_multiline(raw) {
                let cells = align_row(physical, map);

                let status = if cells.iter().all(|c| c.trim().is_empty()) {
                    RowStatus::Validated(RowVerdict::Blank)
                } else if is_continuation(&cells, map) {
                    // Wrapped narration of a rejected row has no transaction to join.
                    if prev_accepted {
                        if let Some(last) = scan.transactions.last_mut() {
                            let extra = map.cell(&cells, CanonicalField::Narration);
                            last.narration =
                                format!("{} {}", last.narration, extra).trim().to_string();
                        }
                    }
                    scan.stats.continuation_count += 1;
                    RowStatus::Continuation
                } else {
                    let verdict = validate_row(&cells, map);
                    scan.stats.total_candidate_count += 1;
                    prev_accepted = verdict.is_accepted();
                    if prev_accepted {
                        scan.transactions.push(build_transaction(&cells, map, row_number));
                        scan.stats.validated_count += 1;
                    } else {
                        trace!(row = row_number, ?verdict, "row rejected");
                    }
                    RowStatus::Validated(verdict)
                };

                scan.rows.push(RowReport {
                    table: table_idx,
                    row: row_number,
                    cells,
                    status,
                });
            }
        }

        source_row += table.rows.len();
    }

    scan
}

/// Expand a row whose cells hold embedded newlines into several rows.
fn split_multiline(row: &[String]) -> Vec<Vec<String>> {
    if !row.iter().any(|c| c.contains('\n')) {
        return vec![row.to_vec()];
    }

    let parts: Vec<Vec<&str>> = row
        .iter()
        .map(|c| c.split('\n').map(str::trim).filter(|p| !p.is_empty()).collect())
        .collect();
    let height = parts.iter().map(Vec::len).max().unwrap_or(0);

    (0..height)
        .map(|i| {
            parts
                .iter()
                .map(|p| p.get(i).copied().unwrap_or("").to_string())
                .collect::<Vec<_>>()
        })
        .filter(|r| r.iter().any(|c| !c.is_empty()))
        .collect()
}

/// Pad or fold a row to the header width.
///
/// Surplus cells are assumed to come from unquoted commas inside the
/// narration and are folded back into it.
fn align_row(mut row: Vec<String>, map: &ColumnMap) -> Vec<String> {
    let width = map.width();

    while row.len() > width && row.last().is_some_and(|c| c.trim().is_empty()) {
        row.pop();
    }

    if row.len() > width {
        if let Some(n) = map.position(CanonicalField::Narration) {
            let extra = row.len() - width;
            let merged = row[n..=n + extra].join(",");
            row.splice(n..=n + extra, std::iter::once(merged));
        } else {
            row.truncate(width);
        }
    }

    row.resize(width, String::new());
    row
}
