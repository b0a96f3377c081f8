//! Locale-aware parsing of numbers stored as text.
//!
//! Handles currency symbols, thousands/decimal separator ambiguity
//! (`1,234.56` vs `1.234,56`), parenthesized and trailing-minus negatives,
//! and Swiss apostrophe grouping.

use regex::Regex;
use sheetfix_sheet::CellValue;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Currency symbols removed before parsing.
pub const CURRENCY_SYMBOLS: [char; 7] = ['$', '€', '£', '¥', '₽', '₱', '₹'];

/// A numeric-like string reduced to a plain decimal literal and a sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericText {
    /// Unsigned literal using `.` as the decimal point, e.g. `1234.56`
    pub digits: String,
    pub negative: bool,
}

impl NumericText {
    /// The signed value, or `None` if it does not fit a finite `f64`.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        let magnitude: f64 = self.digits.parse().ok()?;
        if !magnitude.is_finite() {
            return None;
        }
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

fn literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("invalid numeric literal regex")
    })
}

/// Clean a numeric-like string.
///
/// Returns `None` when the text is blank or does not reduce to a plain
/// decimal literal.
///
/// ```
/// use sheetfix_convert::numeric::parse_numeric_text;
///
/// let parsed = parse_numeric_text("(1.234,56)").unwrap();
/// assert_eq!(parsed.digits, "1234.56");
/// assert!(parsed.negative);
/// ```
#[must_use]
pub fn parse_numeric_text(text: &str) -> Option<NumericText> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized: String = trimmed
        .nfkc()
        .filter(|c| *c != '\u{a0}' && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    let mut cleaned = normalized.trim();
    let mut negative = false;

    if let Some(inner) = cleaned
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        cleaned = inner.trim();
        negative = true;
    }
    if let Some(rest) = cleaned.strip_suffix('-') {
        cleaned = rest.trim_end();
        negative = true;
    }
    if let Some(rest) = cleaned.strip_prefix('-') {
        cleaned = rest.trim_start();
        negative = true;
    }
    if let Some(rest) = cleaned.strip_prefix('+') {
        cleaned = rest.trim_start();
    }

    let compact: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();
    let mut digits = resolve_separators(&compact);

    if digits.matches('.').count() > 1 {
        if let Some(pos) = digits.rfind('.') {
            let (head, tail) = digits.split_at(pos);
            digits = format!("{}{}", head.replace('.', ""), tail);
        }
    }

    digits.retain(|c| c != '\'' && c != '\u{2019}');

    if !literal_re().is_match(&digits) {
        return None;
    }

    Some(NumericText { digits, negative })
}

/// Decide which of `.` and `,` is the decimal separator and drop the
/// thousands separator.
fn resolve_separators(s: &str) -> String {
    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                s.replace(',', "")
            } else {
                s.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(comma))
            if s.matches(',').count() == 1 && s[comma + 1..].chars().count() <= 2 =>
        {
            s.replace(',', ".")
        }
        _ => s.replace(',', ""),
    }
}

/// Return true if a value can be safely interpreted as a number.
#[must_use]
pub fn is_numeric_like(text: &str) -> bool {
    parse_numeric_text(text).is_some()
}

/// Convert a cell into a number.
///
/// Numeric cells pass through (NaN becomes `None`); text is parsed with
/// [`parse_numeric_text`]; blanks, booleans, dates and unparseable text
/// give `None`.
#[must_use]
pub fn convert_numeric_text(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) if f.is_nan() => None,
        CellValue::Float(f) => Some(*f),
        CellValue::String(s) => parse_numeric_text(s)?.value(),
        CellValue::Null | CellValue::Bool(_) | CellValue::DateTime(_) => None,
    }
}
