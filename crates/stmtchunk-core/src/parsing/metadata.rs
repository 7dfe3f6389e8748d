use crate::model::{Metadata, RawLine};
use crate::parsing::columns::is_header_line;
use crate::parsing::layout::{split_by_whitespace_gaps, split_cells, split_csv_line};
use crate::parsing::rows::{is_date, parse_amount};

/// Field labels recognized without a colon, longest first so that
/// "Account Holder Name" wins over "Account Holder".
const KNOWN_LABELS: &[&str] = &[
    "account holder name",
    "statement period",
    "account holder",
    "account number",
    "account type",
    "account name",
    "customer name",
    "customer id",
    "branch name",
    "ifsc code",
    "micr code",
    "account no",
    "a/c no",
    "currency",
    "address",
    "branch",
    "period",
    "email",
    "ifsc",
    "micr",
];

const MAX_KEY_LEN: usize = 40;

/// Extract account header fields from the lines before the transaction table.
///
/// Scanning stops at the first table header line or the first line that
/// reads as a transaction. Lines matching no pattern are skipped.
pub fn extract_metadata(lines: &[RawLine]) -> Metadata {
    let mut metadata = Metadata::new();

    for line in lines {
        if is_header_line(&line.text) || looks_like_transaction(&line.text) {
            break;
        }
        for (key, value) in parse_fields(&line.text) {
            metadata.insert(key, value);
        }
    }

    metadata
}

/// First cell is a date and some later cell is an amount.
fn looks_like_transaction(line: &str) -> bool {
    let cells = split_cells(line);
    match cells.split_first() {
        Some((first, rest)) => is_date(first) && rest.iter().any(|c| parse_amount(c).is_some()),
        None => false,
    }
}

/// Pull `key: value` and fixed-label fields out of one line.
fn parse_fields(line: &str) -> Vec<(String, String)> {
    let cells = field_segments(line);
    let mut fields = Vec::new();
    let mut i = 0;

    while i < cells.len() {
        let cell = cells[i].as_str();
        let next = cells.get(i + 1).map(|s| s.as_str());
        i += 1;

        if cell.is_empty() {
            continue;
        }

        if let Some((key, value)) = cell.split_once(':') {
            let key = key.trim();
            let mut value = value
                .trim_start_matches(|c: char| c == ',' || c.is_whitespace())
                .trim_end()
                .to_string();
            if !is_plausible_key(key) || value.starts_with("//") {
                continue;
            }
            if value.is_empty() {
                match next {
                    Some(n) if !n.is_empty() && !n.contains(':') => {
                        value = n.to_string();
                        i += 1;
                    }
                    _ => continue,
                }
            }
            fields.push((key.to_string(), value));
            continue;
        }

        if let Some(label_len) = match_known_label(cell) {
            let key = cell[..label_len].trim();
            let rest = cell[label_len..].trim_start_matches(|c: char| {
                c.is_whitespace() || c == ',' || c == '-' || c == ':'
            });
            if !rest.is_empty() {
                fields.push((key.to_string(), rest.trim().to_string()));
            } else if let Some(n) = next.filter(|n| !n.is_empty()) {
                fields.push((key.to_string(), n.to_string()));
                i += 1;
            }
        }
    }

    fields
}

/// Split a metadata line into field segments.
///
/// Tabs, pipes and layout gaps always separate fields. A comma only does
/// when the text after it opens a new field, so addresses keep their
/// commas. Trailing empty CSV cells are dropped.
fn field_segments(line: &str) -> Vec<String> {
    let line = line
        .trim()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    if line.is_empty() {
        return Vec::new();
    }

    let unquoted;
    let line = if line.contains('"') {
        unquoted = split_csv_line(line)
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        unquoted.as_str()
    } else {
        line
    };

    let coarse: Vec<&str> = if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else if line.contains('|') {
        line.split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    } else {
        split_by_whitespace_gaps(line, 2)
            .into_iter()
            .map(|s| s.text)
            .collect()
    };

    coarse.into_iter().flat_map(split_at_field_commas).collect()
}

fn split_at_field_commas(segment: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in segment.match_indices(',') {
        if pos > start && opens_field(segment[pos + 1..].trim_start()) {
            pieces.push(segment[start..pos].trim().to_string());
            start = pos + 1;
        }
    }
    pieces.push(segment[start..].trim().to_string());
    pieces
}

/// `text` starts with a plausible `key:` or a known label.
fn opens_field(text: &str) -> bool {
    let keyed = text.split_once(':').is_some_and(|(key, value)| {
        !key.contains(',') && is_plausible_key(key.trim()) && !value.starts_with("//")
    });
    keyed || match_known_label(text).is_some()
}

fn is_plausible_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LEN && key.chars().any(|c| c.is_alphabetic())
}

/// Byte length of the known label that starts `cell`, if any.
fn match_known_label(cell: &str) -> Option<usize> {
    KNOWN_LABELS.iter().find_map(|label| {
        let head = cell.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        match cell[label.len()..].chars().next() {
            None => Some(label.len()),
            Some(c) if !c.is_alphanumeric() => Some(label.len()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<RawLine> {
        v.iter()
            .enumerate()
            .map(|(i, s)| RawLine::new(1, i, *s))
            .collect()
    }

    #[test]
    fn test_key_value_lines() {
        let m = extract_metadata(&lines(&[
            "Account Holder: John Doe",
            "Address: 12 High St, Pune",
            "Account No: 50100012345   IFSC: HDFC0000123",
        ]));
        assert_eq!(m.get("Account Holder"), Some("John Doe"));
        assert_eq!(m.get("Address"), Some("12 High St, Pune"));
        assert_eq!(m.get("Account No"), Some("50100012345"));
        assert_eq!(m.get("IFSC"), Some("HDFC0000123"));
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn test_fixed_labels_without_colon() {
        let m = extract_metadata(&lines(&[
            "Account Holder    John Doe",
            "Address,22 Park Road",
            "Branch - Koregaon Park",
        ]));
        assert_eq!(m.get("Account Holder"), Some("John Doe"));
        assert_eq!(m.get("Address"), Some("22 Park Road"));
        assert_eq!(m.get("Branch"), Some("Koregaon Park"));
    }

    #[test]
    fn test_label_in_separate_cell() {
        let m = extract_metadata(&lines(&["Name:\tJane Roe", "Currency\tINR"]));
        assert_eq!(m.get("Name"), Some("Jane Roe"));
        assert_eq!(m.get("Currency"), Some("INR"));
    }

    #[test]
    fn test_values_keep_their_commas() {
        let m = extract_metadata(&lines(&[
            "Address: Flat 4, MG Road, Pune 411001",
            "Branch: Koregaon Park, Pune      Account No: 50100012345",
        ]));
        assert_eq!(m.get("Address"), Some("Flat 4, MG Road, Pune 411001"));
        assert_eq!(m.get("Branch"), Some("Koregaon Park, Pune"));
        assert_eq!(m.get("Account No"), Some("50100012345"));
    }

    #[test]
    fn test_csv_metadata_rows() {
        let m = extract_metadata(&lines(&[
            "Account Holder,John Doe,,,,,",
            "Address: Flat 4, MG Road, Pune 411001,,,,,,",
            "\"Address Line 2: Near City Mall, Pune\",,,",
            "Account No: 50100012345,IFSC: HDFC0000123,,",
            "Currency,,INR",
        ]));
        assert_eq!(m.get("Account Holder"), Some("John Doe"));
        assert_eq!(m.get("Address"), Some("Flat 4, MG Road, Pune 411001"));
        assert_eq!(m.get("Address Line 2"), Some("Near City Mall, Pune"));
        assert_eq!(m.get("Account No"), Some("50100012345"));
        assert_eq!(m.get("IFSC"), Some("HDFC0000123"));
        assert_eq!(m.get("Currency"), Some("INR"));
    }

    #[test]
    fn test_order_is_first_seen_and_duplicates_ignored() {
        let m = extract_metadata(&lines(&[
            "Currency: INR",
            "Account Holder: A",
            "Currency: USD",
        ]));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["Currency", "Account Holder"]);
        assert_eq!(m.get("Currency"), Some("INR"));
    }

    #[test]
    fn test_stops_at_header_line() {
        let m = extract_metadata(&lines(&[
            "Account Holder: John Doe",
            "Date,Narration,Chq/Ref,Date_1,Withdrawal,Deposit,Balance",
            "Note: after the header",
        ]));
        assert_eq!(m.len(), 1);
        assert!(m.get("Note").is_none());
    }

    #[test]
    fn test_stops_at_first_transaction_line() {
        let m = extract_metadata(&lines(&[
            "Customer ID: 99812",
            "01/04/2024   UPI-ACME STORES   250.00   9,750.00",
            "Remarks: trailing",
        ]));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_unlabelled_lines_ignored() {
        let m = extract_metadata(&lines(&[
            "STATEMENT OF ACCOUNT",
            "Welcome to online banking",
            "https://bank.example/help",
            "10:15",
        ]));
        assert!(m.is_empty());
    }

    #[test]
    fn test_label_prefix_needs_word_boundary() {
        assert_eq!(match_known_label("Addressee Smith"), None);
        assert_eq!(match_known_label("Account Holder Name X"), Some(19));
    }
}
