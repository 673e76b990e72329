//! ISO date and `HH:MM` time helpers for values crossing the API boundary.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::{CoreError, CoreResult};

/// Checks that `s` has exactly the digit/separator layout of `pattern`,
/// where `9` stands for any ASCII digit.
fn has_layout(s: &str, pattern: &str) -> bool {
    s.len() == pattern.len()
        && s.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'9' => c.is_ascii_digit(),
            _ => c == p,
        })
}

/// ## Summary
/// Parses a calendar date in strict `YYYY-MM-DD` form.
///
/// ## Errors
/// Returns `InvalidInput` if the layout is wrong or the date does not exist.
pub fn parse_iso_date(s: &str) -> CoreResult<NaiveDate> {
    if !has_layout(s, "9999-99-99") {
        return Err(CoreError::InvalidInput(format!(
            "date must be YYYY-MM-DD, got {s:?}"
        )));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidInput(format!("invalid date {s:?}: {e}")))
}

/// ## Summary
/// Parses a wall-clock time in strict zero-padded `HH:MM` form.
///
/// ## Errors
/// Returns `InvalidInput` if the layout is wrong or the time does not exist.
pub fn parse_hhmm(s: &str) -> CoreResult<NaiveTime> {
    if !has_layout(s, "99:99") {
        return Err(CoreError::InvalidInput(format!(
            "time must be HH:MM, got {s:?}"
        )));
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| CoreError::InvalidInput(format!("invalid time {s:?}: {e}")))
}

#[must_use]
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[must_use]
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// ## Summary
/// Validates a calendar month and returns its first day.
///
/// ## Errors
/// Returns `InvalidInput` if the year is outside 1..=9999 or the month
/// outside 1..=12.
pub fn first_of_month(year: i32, month: u32) -> CoreResult<NaiveDate> {
    if !(1..=9999).contains(&year) {
        return Err(CoreError::InvalidInput(format!(
            "year must be in 1..=9999, got {year}"
        )));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CoreError::InvalidInput(format!("month must be in 1..=12, got {month}"))
    })
}

/// ## Summary
/// Validates a calendar date given as separate components.
///
/// ## Errors
/// Returns `InvalidInput` if the month is invalid or the day does not exist
/// in that month.
pub fn checked_date(year: i32, month: u32, day: u32) -> CoreResult<NaiveDate> {
    let first = first_of_month(year, month)?;
    first.with_day(day).ok_or_else(|| {
        CoreError::InvalidInput(format!(
            "day {day} does not exist in {year:04}-{month:02}"
        ))
    })
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (next, date.with_day(1)) {
        (Some(next), Some(first)) => u32::try_from((next - first).num_days()).unwrap_or(31),
        _ => 31,
    }
}
