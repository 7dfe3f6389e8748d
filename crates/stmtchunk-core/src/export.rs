use std::fmt::Write;

use crate::model::ProcessResult;

/// Render a processing result as a Markdown document, one section per chunk.
pub fn to_markdown(result: &ProcessResult) -> String {
    let mut out = String::from("# Bank Statement\n\n");
    let _ = write!(
        out,
        "Total chunks: {}\n\nFallback used: {}\n\n---\n\n",
        result.chunks().len(),
        result.fallback_used()
    );
    for (i, chunk) in result.chunks().iter().enumerate() {
        let _ = write!(out, "## Chunk {}\n\n{}\n\n---\n\n", i + 1, chunk);
    }
    out
}
