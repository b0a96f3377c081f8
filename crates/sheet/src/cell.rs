use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;

/// One spreadsheet cell.
///
/// Excel readers produce every variant; CSV readers only produce `Null`,
/// `Bool`, `Int`, `Float` and `String`. Numbers typed as text in the
/// source stay `String` until the conversion step rewrites them.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric content of `Int` and `Float` cells. Text is never parsed
    /// here, even when it looks like a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            CellValue::Int(i) => Some(i as f64),
            CellValue::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Borrow the text of a `String` cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::String(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// The cell as it would be shown in a CSV field or a header.
    /// Empty cells give an empty string.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Guess the type of a raw CSV field.
    ///
    /// Blank fields are `Null`, `true`/`false` in any case are booleans,
    /// then integers and finite floats. Anything else, including
    /// `$1,234.56` or `nan`, is kept verbatim as text.
    #[must_use]
    pub fn infer(raw: &str) -> CellValue {
        let text = raw.trim();
        if text.is_empty() {
            return CellValue::Null;
        }
        if text.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        if let Ok(int) = text.parse::<i64>() {
            return CellValue::Int(int);
        }
        match text.parse::<f64>() {
            Ok(float) if float.is_finite() => CellValue::Float(float),
            _ => CellValue::String(raw.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::String(s) => f.write_str(s),
            // midnight means a plain date
            CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

macro_rules! cell_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for CellValue {
                fn from(value: $source) -> Self {
                    CellValue::$variant(value.into())
                }
            }
        )*
    };
}

cell_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    String => String,
    &str => String,
    NaiveDateTime => DateTime,
}
