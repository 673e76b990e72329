//! Recurrence patterns supported by event definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Zero-based weekday with Monday = 0, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
    /// ## Summary
    /// Validates a stored weekday index.
    ///
    /// ## Errors
    /// Returns `InvalidInput` if `value` is greater than 6.
    pub fn new(value: u8) -> CoreResult<Self> {
        if value <= 6 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidInput(format!(
                "weekday must be in 0..=6, got {value}"
            )))
        }
    }

    #[must_use]
    pub fn from_weekday(weekday: Weekday) -> Self {
        // num_days_from_monday is always 0..=6
        Self(u8::try_from(weekday.num_days_from_monday()).unwrap_or_default())
    }

    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for WeekdayIndex {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<WeekdayIndex> for u8 {
    fn from(value: WeekdayIndex) -> Self {
        value.0
    }
}

/// Nominal day of month, 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    /// ## Errors
    /// Returns `InvalidInput` if `value` is outside 1..=31.
    pub fn new(value: u8) -> CoreResult<Self> {
        if (1..=31).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidInput(format!(
                "day of month must be in 1..=31, got {value}"
            )))
        }
    }

    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self(u8::try_from(date.day()).unwrap_or(1))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DayOfMonth {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<DayOfMonth> for u8 {
    fn from(value: DayOfMonth) -> Self {
        value.0
    }
}

/// Month of year, 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthOfYear(u8);

impl MonthOfYear {
    /// ## Errors
    /// Returns `InvalidInput` if `value` is outside 1..=12.
    pub fn new(value: u8) -> CoreResult<Self> {
        if (1..=12).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidInput(format!(
                "month must be in 1..=12, got {value}"
            )))
        }
    }

    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self(u8::try_from(date.month()).unwrap_or(1))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MonthOfYear {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<MonthOfYear> for u8 {
    fn from(value: MonthOfYear) -> Self {
        value.0
    }
}

/// How an event definition repeats.
///
/// Exactly one pattern is chosen when the definition is created and it never
/// changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "recurrent", rename_all = "snake_case")]
pub enum RecurrenceKind {
    Never,
    Daily,
    Weekly { weekday: WeekdayIndex },
    Monthly { day: DayOfMonth },
    Annual { day: DayOfMonth, month: MonthOfYear },
}

impl RecurrenceKind {
    /// ## Summary
    /// Builds the pattern named by `label`, taking its parameters from the
    /// local date of the first occurrence.
    #[must_use]
    pub fn anchored_at(label: RecurrenceLabel, local_start: NaiveDate) -> Self {
        match label {
            RecurrenceLabel::Never => Self::Never,
            RecurrenceLabel::Daily => Self::Daily,
            RecurrenceLabel::Weekly => Self::Weekly {
                weekday: WeekdayIndex::of_date(local_start),
            },
            RecurrenceLabel::Monthly => Self::Monthly {
                day: DayOfMonth::of_date(local_start),
            },
            RecurrenceLabel::Annual => Self::Annual {
                day: DayOfMonth::of_date(local_start),
                month: MonthOfYear::of_date(local_start),
            },
        }
    }

    #[must_use]
    pub const fn label(self) -> RecurrenceLabel {
        match self {
            Self::Never => RecurrenceLabel::Never,
            Self::Daily => RecurrenceLabel::Daily,
            Self::Weekly { .. } => RecurrenceLabel::Weekly,
            Self::Monthly { .. } => RecurrenceLabel::Monthly,
            Self::Annual { .. } => RecurrenceLabel::Annual,
        }
    }

    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// The literal recurrence token crossing the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceLabel {
    Never,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl RecurrenceLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for RecurrenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "never" => Ok(Self::Never),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported recurrence token: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_weekday_index_counts_from_monday() {
        let days = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        for (index, weekday) in days.into_iter().enumerate() {
            let stored = WeekdayIndex::from_weekday(weekday);
            assert_eq!(usize::from(stored.get()), index);
        }
    }

    #[test]
    fn test_weekday_index_rejects_seven() {
        assert!(WeekdayIndex::new(6).is_ok());
        assert!(matches!(
            WeekdayIndex::new(7),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_day_and_month_bounds() {
        assert!(DayOfMonth::new(0).is_err());
        assert!(DayOfMonth::new(31).is_ok());
        assert!(DayOfMonth::new(32).is_err());
        assert!(MonthOfYear::new(0).is_err());
        assert!(MonthOfYear::new(12).is_ok());
        assert!(MonthOfYear::new(13).is_err());
    }

    #[test]
    fn test_anchored_at_takes_parameters_from_local_date() {
        // 2026-01-14 is a Wednesday
        let start = date(2026, 1, 14);

        assert_eq!(
            RecurrenceKind::anchored_at(RecurrenceLabel::Weekly, start),
            RecurrenceKind::Weekly {
                weekday: WeekdayIndex(2)
            }
        );
        assert_eq!(
            RecurrenceKind::anchored_at(RecurrenceLabel::Monthly, start),
            RecurrenceKind::Monthly {
                day: DayOfMonth(14)
            }
        );
        assert_eq!(
            RecurrenceKind::anchored_at(RecurrenceLabel::Annual, start),
            RecurrenceKind::Annual {
                day: DayOfMonth(14),
                month: MonthOfYear(1)
            }
        );
        assert_eq!(
            RecurrenceKind::anchored_at(RecurrenceLabel::Never, start),
            RecurrenceKind::Never
        );
    }

    #[test]
    fn test_label_tokens() {
        for token in ["never", "daily", "weekly", "monthly", "annual"] {
            let label: RecurrenceLabel = token.parse().expect("known token");
            assert_eq!(label.as_str(), token);
        }
        assert!("hourly".parse::<RecurrenceLabel>().is_err());
        assert!("".parse::<RecurrenceLabel>().is_err());
    }

    #[test]
    fn test_serde_rejects_out_of_range_parameters() {
        let ok: RecurrenceKind =
            serde_json::from_str(r#"{"recurrent":"weekly","weekday":2}"#).expect("valid");
        assert_eq!(ok.label(), RecurrenceLabel::Weekly);

        let bad = serde_json::from_str::<RecurrenceKind>(r#"{"recurrent":"weekly","weekday":9}"#);
        assert!(bad.is_err());

        let bad = serde_json::from_str::<RecurrenceKind>(
            r#"{"recurrent":"annual","day":12,"month":13}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_only_never_is_not_recurring() {
        assert!(!RecurrenceKind::Never.is_recurring());
        assert!(RecurrenceKind::Daily.is_recurring());
    }
}
