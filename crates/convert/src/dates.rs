//! Date-column coercion

use crate::names::{find_columns_with_keywords, normalize_column_name};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use sheetfix_sheet::datetime::excel_serial_to_datetime;
use sheetfix_sheet::{CellValue, Sheet};
use std::sync::OnceLock;

/// Column-name keywords that mark date columns.
pub const DATE_KEYWORDS: [&str; 3] = ["fecha", "liberacion", "liberación"];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

const MONTHS: [(&str, u32); 13] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

fn long_form_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(\d{1,2}) de ([a-z]+)(?: de)? (\d{4})(?:,? (\d{1,2}):(\d{2})(?::(\d{2}))?(?: ?hs\.?)?)?$",
        )
        .expect("invalid long date regex")
    })
}

/// Parse `15 de enero de 2024 10:30 hs.` and its variants.
fn parse_long_form(text: &str) -> Option<NaiveDateTime> {
    let normalized = normalize_column_name(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let caps = long_form_re().captures(&normalized)?;

    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_name = caps.get(2)?.as_str();
    let (_, month) = MONTHS.iter().find(|(name, _)| *name == month_name)?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    let hour: u32 = caps.get(4).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let minute: u32 = caps.get(5).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = caps.get(6).map_or(Some(0), |m| m.as_str().parse().ok())?;

    NaiveDate::from_ymd_opt(year, *month, day)?.and_hms_opt(hour, minute, second)
}

/// Parse a date or date-time written as text. Day-first for slashed
/// dates; offsets are dropped, keeping the wall-clock time.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    parse_long_form(text)
}

/// Coerce one cell to a date-time. Numbers are Excel serial dates;
/// anything unrecognized becomes empty.
#[must_use]
pub fn coerce_date_cell(cell: &CellValue) -> CellValue {
    let parsed = match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Int(i) => excel_serial_to_datetime(*i as f64),
        CellValue::Float(f) => excel_serial_to_datetime(*f),
        CellValue::String(s) => parse_date_text(s),
        CellValue::Null | CellValue::Bool(_) => None,
    };
    parsed.map_or(CellValue::Null, CellValue::DateTime)
}

/// Coerce every column whose name matches one of `keywords` to dates.
/// Returns the coerced column names in column order.
pub fn coerce_date_columns<K: AsRef<str>>(
    sheet: &mut Sheet,
    keywords: &[K],
) -> sheetfix_sheet::Result<Vec<String>> {
    let names = sheet.column_names().cloned().unwrap_or_default();
    let date_columns = find_columns_with_keywords(&names, keywords);

    for column in &date_columns {
        sheet.column_map_by_name(column, coerce_date_cell)?;
    }

    Ok(date_columns)
}
