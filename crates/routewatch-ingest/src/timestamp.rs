//! Timestamp parsing for the status-time column.
//!
//! The column may hold a spreadsheet-native date/time (an Excel serial day
//! number) or a string in one of the common operational formats. Either way
//! the wall-clock value is interpreted in US Eastern time.
//!
//! DST policy: a fall-back overlap resolves to the earlier instant; a
//! spring-forward gap does not exist on the clock and is rejected.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use routewatch_core::config::EASTERN;
use routewatch_core::table::CellValue;
use thiserror::Error;

/// Day 0 of the Excel serial date system (the 1900 leap-year quirk makes
/// this 1899-12-30, not 1899-12-31)
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial numbers outside this range are junk, not dates
const MAX_SERIAL_DAYS: f64 = 2_958_465.0; // 9999-12-31

/// String formats accepted for the timestamp column, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
];

/// Date-only formats; midnight is assumed
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("unparseable timestamp")]
    Unparseable,

    #[error("local time does not exist in US Eastern (DST gap)")]
    NonexistentLocalTime,
}

/// Parse a timestamp cell into an Eastern-aware instant.
pub fn parse_eastern(cell: &CellValue) -> Result<chrono::DateTime<Tz>, TimestampError> {
    let naive = match cell {
        CellValue::Number(serial) => serial_to_naive(*serial)?,
        CellValue::Text(s) => text_to_naive(s)?,
        CellValue::Empty => return Err(TimestampError::Unparseable),
    };
    localize(naive)
}

/// Convert an Excel serial day number to a naive date/time.
///
/// The integer part counts days from the epoch; the fraction is the time of
/// day, rounded to the nearest second.
pub fn serial_to_naive(serial: f64) -> Result<NaiveDateTime, TimestampError> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL_DAYS {
        return Err(TimestampError::Unparseable);
    }

    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or(TimestampError::Unparseable)?
        .and_hms_opt(0, 0, 0)
        .ok_or(TimestampError::Unparseable)?;

    let days = serial.trunc() as i64;
    let mut seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    let mut extra_days = 0;
    if seconds >= 86_400 {
        // fraction rounded up to the next midnight
        seconds -= 86_400;
        extra_days = 1;
    }

    epoch
        .checked_add_signed(Duration::days(days + extra_days))
        .and_then(|dt| dt.checked_add_signed(Duration::seconds(seconds)))
        .ok_or(TimestampError::Unparseable)
}

fn text_to_naive(s: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Unparseable);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(TimestampError::Unparseable)
}

fn localize(naive: NaiveDateTime) -> Result<chrono::DateTime<Tz>, TimestampError> {
    match EASTERN.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(TimestampError::NonexistentLocalTime),
    }
}
