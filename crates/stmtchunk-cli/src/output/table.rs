use stmtchunk_core::parsing::decide::{ParseReport, RowReport, RowStatus};
use stmtchunk_core::parsing::{ParseMode, RowVerdict};
use stmtchunk_core::FileReport;

pub fn mode_label(fallback_used: bool) -> &'static str {
    if fallback_used {
        "fallback"
    } else {
        "structured"
    }
}

/// Human-readable rendering of one processed file.
pub fn format_report(report: &FileReport) -> String {
    let info = &report.file_info;
    let result = &report.result;
    let mut out = String::new();

    out.push_str(&format!(
        "File:     {} ({}, {} bytes)\n",
        info.file_path.display(),
        info.file_type,
        info.file_size
    ));
    out.push_str(&format!("Mode:     {}\n", mode_label(result.fallback_used())));
    out.push_str(&format!("Chunks:   {}\n", info.num_chunks));

    if result.metadata().is_empty() {
        out.push_str("Metadata: (none)\n");
    } else {
        out.push_str("Metadata:\n");
        let width = result.metadata().keys().map(str::len).max().unwrap_or(0);
        for (key, value) in result.metadata().iter() {
            out.push_str(&format!("  {key:<width$}  {value}\n"));
        }
    }

    for (i, chunk) in result.chunks().iter().enumerate() {
        out.push_str(&format!("\n--- Chunk {} ---\n", i + 1));
        if chunk.is_empty() {
            out.push_str("(empty)\n");
        } else {
            out.push_str(chunk);
            out.push('\n');
        }
    }

    out
}

/// Human-readable rendering of parse diagnostics.
pub fn format_inspect(report: &ParseReport) -> String {
    let mut out = String::new();

    match &report.header {
        Some(header) => {
            out.push_str(&format!("Header:   {}\n", header.join(" | ")));
            let mapped: Vec<String> = report
                .column_map
                .iter()
                .map(|(field, col)| format!("{field}={col}"))
                .collect();
            out.push_str(&format!("Columns:  {}\n", mapped.join(", ")));
        }
        None => out.push_str("Header:   not found\n"),
    }

    if !report.rows.is_empty() {
        out.push_str("\nRows:\n");
        for row in &report.rows {
            out.push_str(&format_row(row));
        }
    }

    let stats = &report.stats;
    out.push_str(&format!(
        "\nValidated {} of {} candidate row(s), ratio {:.2}",
        stats.validated_count, stats.total_candidate_count, report.acceptance_ratio
    ));
    if stats.continuation_count > 0 {
        out.push_str(&format!(
            ", {} continuation row(s) merged",
            stats.continuation_count
        ));
    }
    out.push('\n');

    let mode = match report.mode {
        ParseMode::Structured => "structured",
        ParseMode::Fallback => "fallback",
    };
    out.push_str(&format!("Mode:     {mode}\n"));
    out
}

fn format_row(row: &RowReport) -> String {
    let cells: Vec<&str> = row
        .cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    format!(
        "  t{:<2} r{:<4} {:<16} {}\n",
        row.table,
        row.row,
        status_label(&row.status),
        cells.join(" | ")
    )
}

fn status_label(status: &RowStatus) -> &'static str {
    match status {
        RowStatus::PreHeader => "pre-header",
        RowStatus::Header => "header",
        RowStatus::Continuation => "continuation",
        RowStatus::Validated(RowVerdict::Accepted) => "accepted",
        RowStatus::Validated(RowVerdict::RepeatedHeader) => "repeated header",
        RowStatus::Validated(RowVerdict::Blank) => "blank",
        RowStatus::Validated(RowVerdict::InvalidDate) => "invalid date",
        RowStatus::Validated(RowVerdict::Summary) => "summary",
    }
}
