use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

use kalends_core::error::CoreError;
use kalends_core::util::datetime::days_in_month;

use super::timezone::local_to_utc;
use crate::error::{ServiceError, ServiceResult};

/// A run of local calendar days together with the UTC instants bounding it.
///
/// `start_utc` is local midnight at the start of `first_day`; `end_utc` is one
/// millisecond before local midnight after `last_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

impl LocalWindow {
    /// ## Summary
    /// The window covering the whole month that starts on `first_of_month`.
    ///
    /// ## Errors
    /// Propagates conversion failures from [`local_to_utc`].
    pub fn month(first_of_month: NaiveDate, tz: Tz) -> ServiceResult<Self> {
        let last = first_of_month + TimeDelta::days(i64::from(days_in_month(first_of_month) - 1));
        Self::spanning(first_of_month, last, tz)
    }

    /// ## Summary
    /// The window covering the single local day `date`.
    ///
    /// ## Errors
    /// Propagates conversion failures from [`local_to_utc`].
    pub fn day(date: NaiveDate, tz: Tz) -> ServiceResult<Self> {
        Self::spanning(date, date, tz)
    }

    /// ## Summary
    /// The window from `first_day` through `last_day`, both included.
    ///
    /// ## Errors
    /// Propagates conversion failures from [`local_to_utc`].
    pub fn spanning(first_day: NaiveDate, last_day: NaiveDate, tz: Tz) -> ServiceResult<Self> {
        let after = last_day.succ_opt().ok_or(ServiceError::CoreError(
            CoreError::InvariantViolation("window ends at the last representable date"),
        ))?;
        let start_utc = local_to_utc(tz, first_day.and_time(NaiveTime::MIN))?;
        let end_utc = local_to_utc(tz, after.and_time(NaiveTime::MIN))? - TimeDelta::milliseconds(1);
        Ok(Self {
            first_day,
            last_day,
            start_utc,
            end_utc,
        })
    }

    /// Local days of the window in calendar order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last_day;
        self.first_day.iter_days().take_while(move |day| *day <= last)
    }
}

#[cfg(test)]
mod tests {
    use chrono_tz::{America, Asia, Europe};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid instant")
    }

    #[test]
    fn test_month_window_bounds() {
        let window = LocalWindow::month(date(2026, 2, 1), Europe::Moscow).expect("window");
        assert_eq!(window.last_day, date(2026, 2, 28));
        assert_eq!(window.start_utc, instant("2026-01-31T21:00:00Z"));
        assert_eq!(window.end_utc, instant("2026-02-28T20:59:59.999Z"));
        assert_eq!(window.days().count(), 28);
    }

    #[test]
    fn test_day_window_spans_two_utc_days() {
        let window = LocalWindow::day(date(2026, 7, 1), America::Los_Angeles).expect("window");
        assert_eq!(window.start_utc, instant("2026-07-01T07:00:00Z"));
        assert_eq!(window.end_utc, instant("2026-07-02T06:59:59.999Z"));
        assert_eq!(window.days().collect::<Vec<_>>(), vec![date(2026, 7, 1)]);
    }

    #[test]
    fn test_day_window_on_short_dst_day() {
        // 23-hour day in New York
        let window = LocalWindow::day(date(2026, 3, 8), America::New_York).expect("window");
        assert_eq!(window.start_utc, instant("2026-03-08T05:00:00Z"));
        assert_eq!(window.end_utc, instant("2026-03-09T03:59:59.999Z"));
    }

    #[test]
    fn test_day_window_starting_in_midnight_gap() {
        let window = LocalWindow::day(date(2026, 3, 29), Asia::Beirut).expect("window");
        assert_eq!(window.start_utc, instant("2026-03-28T22:00:00Z"));
        assert_eq!(window.end_utc, instant("2026-03-29T20:59:59.999Z"));
    }
}
