//! Splitting of raw text lines into cells.
//!
//! Statement text arrives in several shapes: `pdftotext -layout` output where
//! columns are aligned with runs of spaces, CSV lines, and tab-joined
//! worksheet rows. These helpers turn one line into cells without knowing
//! which of those it came from.

/// A run of text within a line, with its position in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Char offset of the first character.
    pub start: usize,
    /// Char offset one past the last character.
    pub end: usize,
}

impl Segment<'_> {
    /// Twice the centre position, kept integral.
    pub fn center2(&self) -> usize {
        self.start + self.end
    }
}

/// Split a line by gaps of at least `min_gap` whitespace characters.
pub fn split_by_whitespace_gaps(line: &str, min_gap: usize) -> Vec<Segment<'_>> {
    let min_gap = min_gap.max(1);
    let mut segments = Vec::new();
    // (byte start, char start) of the open segment
    let mut open: Option<(usize, usize)> = None;
    // (byte pos, char pos) just past the last non-space char
    let mut last_end = (0, 0);
    let mut space_count = 0;

    for (char_pos, (byte_pos, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == min_gap {
                if let Some((bs, cs)) = open.take() {
                    segments.push(Segment {
                        text: &line[bs..last_end.0],
                        start: cs,
                        end: last_end.1,
                    });
                }
            }
        } else {
            if open.is_none() {
                open = Some((byte_pos, char_pos));
            }
            space_count = 0;
            last_end = (byte_pos + c.len_utf8(), char_pos + 1);
        }
    }

    if let Some((bs, cs)) = open {
        segments.push(Segment {
            text: &line[bs..last_end.0],
            start: cs,
            end: last_end.1,
        });
    }

    segments
}

/// Split a raw line into trimmed cells.
///
/// Tabs and pipes win over commas, commas over layout gaps of 2+ spaces.
/// A line with a single comma is treated as prose, not CSV.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.contains('\t') {
        return trimmed.split('\t').map(|c| c.trim().to_string()).collect();
    }
    if trimmed.contains('|') {
        return trimmed
            .split('|')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if trimmed.matches(',').count() >= 2 {
        return split_csv_line(trimmed);
    }

    split_by_whitespace_gaps(trimmed, 2)
        .into_iter()
        .map(|s| s.text.to_string())
        .collect()
}

/// Split on commas, honouring double-quoted fields.
pub(crate) fn split_csv_line(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(|c| c.trim().to_string()).collect(),
        _ => line.split(',').map(|c| c.trim().to_string()).collect(),
    }
}
