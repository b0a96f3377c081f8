//! Excel serial date conversion

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day zero of the 1900 date system. Using 1899-12-30 absorbs Excel's
/// phantom 1900-02-29 for every serial after it.
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert an Excel serial date to a naive date-time.
///
/// Returns `None` for negative or non-finite serials and for values past
/// the last date Excel can represent (9999-12-31).
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a naive date-time to an Excel serial date
pub fn datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let elapsed = dt.signed_duration_since(excel_epoch());
    elapsed.num_milliseconds() as f64 / 86_400_000.0
}
