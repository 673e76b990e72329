use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{DayOfMonth, EventDefinition, MonthOfYear, OwnerId, RecurrenceKind, WeekdayIndex};

/// Storage-level filter selecting every definition that might produce an
/// occurrence inside a UTC window.
///
/// The filter is deliberately loose: it may return definitions that turn out
/// to have no occurrence in the window, but it must never drop one that does.
/// `None` in a band means "any value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub owner_id: OwnerId,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub weekdays: Option<BTreeSet<WeekdayIndex>>,
    pub monthly_days: Option<BTreeSet<DayOfMonth>>,
    pub annual_days: Option<BTreeSet<DayOfMonth>>,
    pub annual_months: BTreeSet<MonthOfYear>,
}

impl CandidateQuery {
    /// ## Summary
    /// Evaluates the filter against one definition, with the same meaning as
    /// the SQL the database adapter generates.
    #[must_use]
    pub fn matches(&self, definition: &EventDefinition) -> bool {
        if definition.owner_id != self.owner_id || definition.start_at > self.window_end {
            return false;
        }

        match &definition.recurrence {
            RecurrenceKind::Never => definition.start_at >= self.window_start,
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekly { weekday } => in_band(self.weekdays.as_ref(), weekday),
            RecurrenceKind::Monthly { day } => in_band(self.monthly_days.as_ref(), day),
            RecurrenceKind::Annual { day, month } => {
                self.annual_months.contains(month) && in_band(self.annual_days.as_ref(), day)
            }
        }
    }
}

fn in_band<T: Ord>(band: Option<&BTreeSet<T>>, value: &T) -> bool {
    band.is_none_or(|set| set.contains(value))
}
