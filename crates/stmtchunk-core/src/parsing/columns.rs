use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::model::CanonicalField;
use crate::parsing::layout::split_cells;

/// Normalize an observed column header to an alias-table key.
///
/// Steps:
/// 1. Lowercase
/// 2. Turn punctuation and separators into spaces, collapse whitespace
/// 3. Drop a trailing de-duplication counter ("Date_1" -> "date")
/// 4. Drop trailing qualifiers such as "Amt.", "No." or "(INR)"
pub fn normalize_header(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();

    let mut spaced = String::with_capacity(lower.len());
    for c in lower.chars() {
        if c.is_alphanumeric() {
            spaced.push(c);
        } else {
            spaced.push(' ');
        }
    }

    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();

    if tokens.len() >= 2 && tokens[tokens.len() - 1].chars().all(|c| c.is_ascii_digit()) {
        tokens.pop();
    }

    while tokens.len() >= 2 && is_trailing_qualifier(tokens[tokens.len() - 1]) {
        tokens.pop();
    }

    tokens.join(" ")
}

fn is_trailing_qualifier(token: &str) -> bool {
    matches!(
        token,
        "amt" | "amount" | "no" | "nr" | "number" | "rs" | "inr" | "usd" | "eur" | "gbp"
    )
}

/// Look up the canonical field for a raw header cell.
pub fn detect_field(raw: &str) -> Option<CanonicalField> {
    ALIASES.get(normalize_header(raw).as_str()).copied()
}

static ALIASES: LazyLock<HashMap<&'static str, CanonicalField>> = LazyLock::new(|| {
    use CanonicalField::*;

    let mut m = HashMap::new();

    // Transaction date
    m.insert("date", Date);
    m.insert("dt", Date);
    m.insert("txn date", Date);
    m.insert("tran date", Date);
    m.insert("trans date", Date);
    m.insert("transaction date", Date);
    m.insert("posting date", Date);
    m.insert("post date", Date);
    m.insert("booking date", Date);
    m.insert("book date", Date);

    // Narration
    m.insert("narration", Narration);
    m.insert("particulars", Narration);
    m.insert("description", Narration);
    m.insert("details", Narration);
    m.insert("transaction details", Narration);
    m.insert("transaction description", Narration);
    m.insert("remarks", Narration);
    m.insert("transaction remarks", Narration);

    // Cheque / reference
    m.insert("chq", ChqRef);
    m.insert("cheque", ChqRef);
    m.insert("chq ref", ChqRef);
    m.insert("cheque ref", ChqRef);
    m.insert("chq cheque", ChqRef);
    m.insert("ref", ChqRef);
    m.insert("reference", ChqRef);
    m.insert("ref chq", ChqRef);
    m.insert("utr", ChqRef);
    m.insert("instrument", ChqRef);

    // Value date
    m.insert("value date", ValueDate);
    m.insert("value dt", ValueDate);
    m.insert("valuedt", ValueDate);
    m.insert("val date", ValueDate);
    m.insert("val dt", ValueDate);

    // Withdrawal
    m.insert("withdrawal", Withdrawal);
    m.insert("withdrawals", Withdrawal);
    m.insert("debit", Withdrawal);
    m.insert("debits", Withdrawal);
    m.insert("dr", Withdrawal);
    m.insert("withdrawal dr", Withdrawal);
    m.insert("amount debited", Withdrawal);
    m.insert("paid out", Withdrawal);
    m.insert("money out", Withdrawal);

    // Deposit
    m.insert("deposit", Deposit);
    m.insert("deposits", Deposit);
    m.insert("credit", Deposit);
    m.insert("credits", Deposit);
    m.insert("cr", Deposit);
    m.insert("deposit cr", Deposit);
    m.insert("amount credited", Deposit);
    m.insert("paid in", Deposit);
    m.insert("money in", Deposit);

    // Running balance
    m.insert("balance", Balance);
    m.insert("bal", Balance);
    m.insert("closing balance", Balance);
    m.insert("running balance", Balance);
    m.insert("available balance", Balance);

    m
});

/// Positions of canonical fields within an accepted header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    header: Vec<String>,
    positions: BTreeMap<CanonicalField, usize>,
}

impl ColumnMap {
    /// Map a header row onto the canonical schema.
    ///
    /// Returns `None` unless Date, Narration and at least one amount column
    /// are present. Each field keeps its first matching column; a second Date
    /// column is read as the value date.
    pub fn from_header_row(cells: &[String]) -> Option<ColumnMap> {
        let mut positions = BTreeMap::new();

        for (idx, cell) in cells.iter().enumerate() {
            let Some(mut field) = detect_field(cell) else {
                continue;
            };
            if field == CanonicalField::Date
                && positions.contains_key(&CanonicalField::Date)
                && !positions.contains_key(&CanonicalField::ValueDate)
            {
                field = CanonicalField::ValueDate;
            }
            positions.entry(field).or_insert(idx);
        }

        let has_amount = CanonicalField::AMOUNTS
            .iter()
            .any(|f| positions.contains_key(f));
        if !positions.contains_key(&CanonicalField::Date)
            || !positions.contains_key(&CanonicalField::Narration)
            || !has_amount
        {
            return None;
        }

        Some(ColumnMap {
            header: cells.iter().map(|c| c.trim().to_string()).collect(),
            positions,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    /// Mapped fields with their positions, in canonical order.
    pub fn mapped(&self) -> impl Iterator<Item = (CanonicalField, usize)> + '_ {
        self.positions.iter().map(|(f, i)| (*f, *i))
    }

    /// The trimmed cell for `field`, or "" when unmapped or out of range.
    pub fn cell<'a>(&self, row: &'a [String], field: CanonicalField) -> &'a str {
        self.position(field)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// Whether a row repeats the header text (pagination artifact).
    pub fn is_header_repeat(&self, row: &[String]) -> bool {
        let norm = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let observed: Vec<String> = row.iter().map(|c| norm(c)).collect();
        let expected: Vec<String> = self.header.iter().map(|c| norm(c)).collect();
        trim_trailing_blanks(&observed) == trim_trailing_blanks(&expected)
    }
}

fn trim_trailing_blanks(cells: &[String]) -> &[String] {
    let end = cells
        .iter()
        .rposition(|c| !c.is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    &cells[..end]
}

/// Whether a raw text line reads as a transaction-table header.
pub fn is_header_line(line: &str) -> bool {
    let cells = split_cells(line);
    cells.len() >= 3 && ColumnMap::from_header_row(&cells).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_strips_qualifiers() {
        assert_eq!(normalize_header("Withdrawal Amt."), "withdrawal");
        assert_eq!(normalize_header("Deposit Amt. (INR)"), "deposit");
        assert_eq!(normalize_header("Chq./Ref.No."), "chq ref");
        assert_eq!(normalize_header("  Value   Dt "), "value dt");
        assert_eq!(normalize_header("Date_1"), "date");
    }

    #[test]
    fn test_single_qualifier_word_is_kept() {
        assert_eq!(normalize_header("Amount"), "amount");
        assert_eq!(normalize_header("No."), "no");
    }

    #[test]
    fn test_detect_field_aliases() {
        assert_eq!(detect_field("Particulars"), Some(CanonicalField::Narration));
        assert_eq!(detect_field("DEBIT"), Some(CanonicalField::Withdrawal));
        assert_eq!(detect_field("Cr"), Some(CanonicalField::Deposit));
        assert_eq!(detect_field("Closing Balance"), Some(CanonicalField::Balance));
        assert_eq!(detect_field("Tran Date"), Some(CanonicalField::Date));
        assert_eq!(detect_field("Init/Br"), None);
    }

    #[test]
    fn test_no_partial_matching() {
        assert_eq!(detect_field("Statement Date Range"), None);
        assert_eq!(detect_field("Balance brought forward from"), None);
    }

    #[test]
    fn test_standard_header_maps_all_fields() {
        let map = ColumnMap::from_header_row(&cells(&[
            "Date",
            "Narration",
            "Chq/Ref",
            "Date_1",
            "Withdrawal",
            "Deposit",
            "Balance",
        ]))
        .unwrap();
        assert_eq!(map.position(CanonicalField::Date), Some(0));
        assert_eq!(map.position(CanonicalField::ValueDate), Some(3));
        assert_eq!(map.position(CanonicalField::Balance), Some(6));
        assert_eq!(map.mapped().count(), 7);
    }

    #[test]
    fn test_reordered_and_renamed_header() {
        let map = ColumnMap::from_header_row(&cells(&[
            "Sl No",
            "Particulars",
            "Txn Date",
            "Credit",
            "Debit",
        ]))
        .unwrap();
        assert_eq!(map.position(CanonicalField::Narration), Some(1));
        assert_eq!(map.position(CanonicalField::Date), Some(2));
        assert_eq!(map.position(CanonicalField::Deposit), Some(3));
        assert_eq!(map.position(CanonicalField::Withdrawal), Some(4));
        assert_eq!(map.position(CanonicalField::Balance), None);
        assert_eq!(map.width(), 5);
    }

    #[test]
    fn test_header_without_triad_rejected() {
        assert!(ColumnMap::from_header_row(&cells(&["Date", "Narration", "Ref"])).is_none());
        assert!(ColumnMap::from_header_row(&cells(&["Date", "Balance"])).is_none());
        assert!(ColumnMap::from_header_row(&cells(&["Account Holder", "John"])).is_none());
    }

    #[test]
    fn test_header_repeat_detection() {
        let header = cells(&["Date", "Narration", "Withdrawal", "Balance"]);
        let map = ColumnMap::from_header_row(&header).unwrap();
        assert!(map.is_header_repeat(&cells(&["date", " Narration ", "Withdrawal", "Balance", ""])));
        assert!(!map.is_header_repeat(&cells(&["01/01/2024", "x", "1", "2"])));
    }

    #[test]
    fn test_is_header_line() {
        assert!(is_header_line(
            "  Date   Narration        Chq./Ref.No.   Value Dt   Withdrawal Amt.   Deposit Amt.   Closing Balance"
        ));
        assert!(is_header_line("Date,Narration,Chq/Ref,Date_1,Withdrawal,Deposit,Balance"));
        assert!(!is_header_line("Account Holder: John Doe"));
    }
}
