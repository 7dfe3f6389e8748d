use crate::extraction::RawTable;
use crate::parsing::columns::ColumnMap;
use crate::parsing::layout::{split_by_whitespace_gaps, Segment};

/// Text lines of one page of `pdftotext -layout` output.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Column extents taken from a layout header line.
///
/// pdftotext -layout keeps columns aligned with spaces, so the header
/// cells' char positions tell which column every later segment belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    header: Vec<String>,
    /// Doubled boundaries between neighbouring columns.
    boundaries2: Vec<usize>,
}

impl ColumnLayout {
    /// Build a layout if `line` is an accepted transaction header.
    pub fn from_header_line(line: &str) -> Option<ColumnLayout> {
        let segments = split_by_whitespace_gaps(line, 2);
        let header: Vec<String> = segments.iter().map(|s| s.text.to_string()).collect();
        ColumnMap::from_header_row(&header)?;

        let boundaries2 = segments
            .windows(2)
            .map(|pair| pair[0].end + pair[1].start)
            .collect();
        Some(ColumnLayout {
            header,
            boundaries2,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Column index for a segment, by the position of its centre.
    fn column_for(&self, segment: &Segment<'_>) -> usize {
        let c2 = segment.center2();
        self.boundaries2
            .iter()
            .position(|b| c2 <= *b)
            .unwrap_or(self.boundaries2.len())
    }

    /// Distribute the segments of a data line over the columns.
    pub fn split_line(&self, line: &str) -> Vec<String> {
        let mut cells = vec![String::new(); self.header.len()];
        for segment in split_by_whitespace_gaps(line, 2) {
            let cell = &mut cells[self.column_for(&segment)];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(segment.text);
        }
        cells
    }
}

/// Rebuild transaction tables from layout pages.
///
/// The first header line found anchors the columns. Each page yields one
/// table holding the lines below its header (or all lines, for pages
/// without one once a layout is known). Header lines on later pages
/// re-anchor the columns and are not emitted as rows.
pub fn reconstruct_tables(pages: &[PageText]) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut layout: Option<ColumnLayout> = None;

    for page in pages {
        let header_at = page
            .lines
            .iter()
            .enumerate()
            .find_map(|(i, l)| ColumnLayout::from_header_line(l).map(|h| (i, h)));

        let mut rows = Vec::new();
        let body_start = match header_at {
            Some((i, page_layout)) => {
                if layout.is_none() {
                    rows.push(page_layout.header().to_vec());
                }
                layout = Some(page_layout);
                i + 1
            }
            None => 0,
        };

        let Some(active) = layout.as_ref() else {
            continue;
        };

        rows.extend(
            page.lines[body_start..]
                .iter()
                .filter(|l| !l.trim().is_empty())
                .map(|l| active.split_line(l)),
        );

        if !rows.is_empty() {
            tables.push(RawTable {
                page: page.page_number,
                rows,
            });
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Date        Narration                 Chq./Ref.No.    Value Dt     Withdrawal Amt.   Deposit Amt.    Closing Balance";

    #[test]
    fn test_layout_from_header_line() {
        let layout = ColumnLayout::from_header_line(HEADER).unwrap();
        assert_eq!(layout.header().len(), 7);
        assert_eq!(layout.header()[2], "Chq./Ref.No.");
        assert!(ColumnLayout::from_header_line("Account Holder   John Doe").is_none());
    }

    #[test]
    fn test_split_line_places_sparse_amounts() {
        let layout = ColumnLayout::from_header_line(HEADER).unwrap();
        let withdrawal =
            "01/04/24    UPI-ACME STORES           0000412345      01/04/24           250.00                        9,750.00";
        let deposit =
            "02/04/24    SALARY APRIL                              02/04/24                          50,000.00     59,750.00";

        let cells = layout.split_line(withdrawal);
        assert_eq!(cells[0], "01/04/24");
        assert_eq!(cells[1], "UPI-ACME STORES");
        assert_eq!(cells[2], "0000412345");
        assert_eq!(cells[4], "250.00");
        assert_eq!(cells[5], "");
        assert_eq!(cells[6], "9,750.00");

        let cells = layout.split_line(deposit);
        assert_eq!(cells[2], "");
        assert_eq!(cells[3], "02/04/24");
        assert_eq!(cells[4], "");
        assert_eq!(cells[5], "50,000.00");
        assert_eq!(cells[6], "59,750.00");
    }

    #[test]
    fn test_reconstruct_tables_across_pages() {
        let pages = vec![
            PageText {
                page_number: 1,
                lines: vec![
                    "Account Holder: John Doe".into(),
                    "".into(),
                    HEADER.into(),
                    "01/04/24    UPI-ACME STORES           0000412345      01/04/24           250.00                        9,750.00".into(),
                ],
            },
            PageText {
                page_number: 2,
                lines: vec![
                    "HDFC BANK LTD".into(),
                    HEADER.into(),
                    "03/04/24    RENT                                      03/04/24         9,000.00                          750.00".into(),
                ],
            },
        ];

        let tables = reconstruct_tables(&pages);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[0][0], "Date");
        assert_eq!(tables[1].page, 2);
        assert_eq!(tables[1].rows.len(), 1);
        assert_eq!(tables[1].rows[0][1], "RENT");
    }

    #[test]
    fn test_no_header_no_tables() {
        let pages = vec![PageText {
            page_number: 1,
            lines: vec!["scanned statement".into(), "nothing tabular".into()],
        }];
        assert!(reconstruct_tables(&pages).is_empty());
    }
}
