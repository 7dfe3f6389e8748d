use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::model::{CanonicalField, Transaction};
use crate::parsing::columns::ColumnMap;

/// Why a candidate row was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowVerdict {
    Accepted,
    RepeatedHeader,
    Blank,
    InvalidDate,
    Summary,
}

impl RowVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RowVerdict::Accepted)
    }
}

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,4}[/.\-]\d{1,2}[/.\-]\d{2,4}(?:\s+\d{1,2}:\d{2}(?::\d{2})?)?$")
        .expect("numeric date pattern")
});

static MONTH_NAME_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\d{1,2}[\s/\-]?(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*[\s/\-,]*\d{2,4}$",
    )
    .expect("month-name date pattern")
});

/// Labels of statement summary lines that carry amounts but are not
/// transactions.
const SUMMARY_LABELS: &[&str] = &[
    "closing balance",
    "total",
    "totals",
    "page total",
    "sub total",
    "subtotal",
    "grand total",
    "transaction total",
    "carried forward",
    "balance carried forward",
];

const OPENING_BALANCE: &str = "opening balance";

const CURRENCY_PREFIXES: &[&str] = &["rs.", "rs", "inr", "₹", "$", "€", "£"];

/// Whether a cell holds a recognized statement date.
pub fn is_date(cell: &str) -> bool {
    let cell = cell.trim();
    NUMERIC_DATE.is_match(cell) || MONTH_NAME_DATE.is_match(cell)
}

/// Parse an amount cell.
///
/// Handles thousands separators, currency markers, trailing Cr/Dr and
/// accounting parentheses. Returns `None` for blanks and non-numeric text.
pub fn parse_amount(cell: &str) -> Option<Decimal> {
    let mut s = cell.trim();
    for prefix in CURRENCY_PREFIXES {
        if s.get(..prefix.len()).is_some_and(|h| h.eq_ignore_ascii_case(prefix)) {
            s = s[prefix.len()..].trim_start();
            break;
        }
    }
    for suffix in ["cr", "dr"] {
        let cut = s.len().saturating_sub(suffix.len());
        if cut > 0 && s.get(cut..).is_some_and(|t| t.eq_ignore_ascii_case(suffix)) {
            s = s[..cut].trim_end();
            break;
        }
    }

    let mut negative = false;
    let mut digits = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            '-' if digits.is_empty() => negative = true,
            '(' if digits.is_empty() => negative = true,
            ',' | ' ' | ')' => {}
            _ => return None,
        }
    }

    if digits.is_empty() {
        return None;
    }
    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

fn normalize_label(cell: &str) -> String {
    cell.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches([':', '.'])
        .to_string()
}

fn is_summary_label(cell: &str) -> bool {
    let label = normalize_label(cell);
    !label.is_empty() && SUMMARY_LABELS.iter().any(|l| label == *l)
}

fn is_opening_balance_marker(row: &[String]) -> bool {
    row.iter().any(|c| normalize_label(c) == OPENING_BALANCE)
}

fn has_amount(row: &[String], map: &ColumnMap) -> bool {
    CanonicalField::AMOUNTS
        .iter()
        .any(|f| parse_amount(map.cell(row, *f)).is_some())
}

/// Classify a row aligned to `map`.
pub fn validate_row(row: &[String], map: &ColumnMap) -> RowVerdict {
    if map.is_header_repeat(row) {
        return RowVerdict::RepeatedHeader;
    }

    if row.iter().all(|c| c.trim().is_empty()) {
        return RowVerdict::Blank;
    }

    if !is_date(map.cell(row, CanonicalField::Date)) && !is_opening_balance_marker(row) {
        return RowVerdict::InvalidDate;
    }

    let narration = map.cell(row, CanonicalField::Narration);
    let labelled_summary = row.iter().any(|c| is_summary_label(c));
    if (labelled_summary && (narration.is_empty() || is_summary_label(narration)))
        || (narration.is_empty() && !has_amount(row, map))
    {
        return RowVerdict::Summary;
    }

    RowVerdict::Accepted
}

/// A wrapped narration line: no date, some narration, no amounts.
pub fn is_continuation(row: &[String], map: &ColumnMap) -> bool {
    map.cell(row, CanonicalField::Date).is_empty()
        && !map.cell(row, CanonicalField::Narration).is_empty()
        && !is_summary_label(map.cell(row, CanonicalField::Narration))
        && !has_amount(row, map)
}

/// Build a transaction from an accepted row.
pub fn build_transaction(row: &[String], map: &ColumnMap, source_row: usize) -> Transaction {
    let mut txn = Transaction {
        source_row,
        ..Default::default()
    };
    for field in CanonicalField::ALL {
        *txn.field_mut(field) = map.cell(row, field).to_string();
    }
    reconcile_amounts(&mut txn);
    txn
}

/// When both withdrawal and deposit hold non-zero amounts, keep the larger.
///
/// Layout extraction occasionally duplicates an amount into the
/// neighbouring column.
fn reconcile_amounts(txn: &mut Transaction) {
    let withdrawal = parse_amount(&txn.withdrawal).filter(|v| !v.is_zero());
    let deposit = parse_amount(&txn.deposit).filter(|v| !v.is_zero());
    if let (Some(w), Some(d)) = (withdrawal, deposit) {
        if d > w {
            txn.withdrawal.clear();
        } else {
            txn.deposit.clear();
        }
    }
}
