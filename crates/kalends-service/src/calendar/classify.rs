use chrono::{Datelike, NaiveDate};

use kalends_core::model::{RecurrenceKind, RecurrenceLabel, WeekdayIndex};
use kalends_core::util::datetime::days_in_month;

/// Largest nominal day of month.
const MAX_DAY: u32 = 31;

/// ## Summary
/// Decides whether a definition occurs on the local date `target`.
///
/// `local_start` is the local date of the definition's first occurrence in
/// the viewer's zone. Nothing occurs before it, and the weekday, day and
/// month a pattern repeats on are read from it rather than from the
/// parameters stored at creation, which were taken in the creator's zone.
/// Monthly days past the end of a short month are clamped to its last day;
/// annual dates that do not exist in the target year (29 February) do not
/// occur.
#[must_use]
pub fn classify(
    recurrence: RecurrenceKind,
    local_start: NaiveDate,
    target: NaiveDate,
) -> Option<RecurrenceLabel> {
    if target < local_start {
        return None;
    }

    let occurs = match recurrence {
        RecurrenceKind::Never => target == local_start,
        RecurrenceKind::Daily => true,
        RecurrenceKind::Weekly { .. } => {
            WeekdayIndex::of_date(target) == WeekdayIndex::of_date(local_start)
        }
        RecurrenceKind::Monthly { .. } => {
            (target.day()..=target.day() + clamp_rollover(target)).contains(&local_start.day())
        }
        RecurrenceKind::Annual { .. } => {
            target.month() == local_start.month() && target.day() == local_start.day()
        }
    };

    occurs.then_some(recurrence.label())
}

/// ## Summary
/// How many nominal days beyond `date` are clamped onto it.
///
/// Zero except on the last day of a month shorter than 31 days, where every
/// nominal day up to 31 lands.
#[must_use]
pub fn clamp_rollover(date: NaiveDate) -> u32 {
    let length = days_in_month(date);
    if date.day() == length {
        MAX_DAY - length
    } else {
        0
    }
}
