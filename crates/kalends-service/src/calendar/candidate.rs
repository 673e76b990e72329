//! Candidate queries for month and day windows.
//!
//! Stored pattern parameters (weekday, day, month) were taken from the
//! creator's local date at creation. A viewer in another zone, or an owner
//! whose zone changed, sees the first occurrence on a local date up to
//! [`ZONE_DRIFT_DAYS`] away, so every band holds the stored values any such
//! local date could have been recorded with. Anything the bands let through
//! that does not occur is dropped by the classifier.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, TimeDelta};

use kalends_core::model::{CandidateQuery, DayOfMonth, MonthOfYear, OwnerId, WeekdayIndex};

use super::classify::clamp_rollover;
use super::window::LocalWindow;

/// Largest difference between the local dates of one instant in two zones
/// (UTC-12 against UTC+14).
pub const ZONE_DRIFT_DAYS: i64 = 2;

/// A common and a leap year; their months cover every pair of adjacent month
/// lengths.
const SAMPLE_YEARS: [i32; 2] = [2026, 2028];

/// ## Summary
/// Query for every definition that may land somewhere in a run of local
/// days, such as a month or the upcoming horizon.
///
/// Weekly, monthly and daily definitions are always candidates; annual ones
/// only when their stored month is near the window.
#[must_use]
pub fn range_candidates(owner_id: OwnerId, window: &LocalWindow) -> CandidateQuery {
    CandidateQuery {
        owner_id,
        window_start: window.start_utc,
        window_end: window.end_utc,
        weekdays: None,
        monthly_days: None,
        annual_days: None,
        annual_months: window.days().flat_map(drift).map(MonthOfYear::of_date).collect(),
    }
}

/// ## Summary
/// Query for every definition that may land on the single local day of
/// `window`.
///
/// On the last day of a month shorter than 31 days the monthly band also
/// covers the nominal days clamped onto it.
#[must_use]
pub fn day_candidates(owner_id: OwnerId, window: &LocalWindow) -> CandidateQuery {
    let target = window.first_day;

    let weekdays = drift(target).map(WeekdayIndex::of_date).collect();

    let nominal = target.day()..=target.day() + clamp_rollover(target);
    let monthly_days = nominal
        .flat_map(monthly_samples)
        .flat_map(drift)
        .map(DayOfMonth::of_date)
        .collect();

    let annual: Vec<NaiveDate> = annual_samples(target.month(), target.day())
        .flat_map(drift)
        .collect();

    CandidateQuery {
        owner_id,
        window_start: window.start_utc,
        window_end: window.end_utc,
        weekdays: Some(weekdays),
        monthly_days: Some(monthly_days),
        annual_days: Some(annual.iter().copied().map(DayOfMonth::of_date).collect()),
        annual_months: annual.into_iter().map(MonthOfYear::of_date).collect::<BTreeSet<_>>(),
    }
}

/// Dates within [`ZONE_DRIFT_DAYS`] of `date`.
fn drift(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (-ZONE_DRIFT_DAYS..=ZONE_DRIFT_DAYS).map(move |days| date + TimeDelta::days(days))
}

/// Day `day` of every sample month that has it.
fn monthly_samples(day: u32) -> impl Iterator<Item = NaiveDate> {
    SAMPLE_YEARS.into_iter().flat_map(move |year| {
        (1..=12).filter_map(move |month| NaiveDate::from_ymd_opt(year, month, day))
    })
}

/// `month`/`day` in every sample year that has it.
fn annual_samples(month: u32, day: u32) -> impl Iterator<Item = NaiveDate> {
    SAMPLE_YEARS
        .into_iter()
        .filter_map(move |year| NaiveDate::from_ymd_opt(year, month, day))
}
