use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use super::{EventId, OwnerId, RecurrenceLabel};
use crate::util::datetime::format_hhmm;

/// One concrete occurrence of a definition on the owner's local calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub event_id: EventId,
    pub description: String,
    pub local_date: NaiveDate,
    pub local_start_time: NaiveTime,
    pub local_stop_time: Option<NaiveTime>,
    pub recurrence: RecurrenceLabel,
    pub is_single: bool,
}

impl Occurrence {
    /// Minute-resolution ordering key; equal keys keep their input order.
    #[must_use]
    pub fn sort_key(&self) -> (u32, u32) {
        (self.local_start_time.hour(), self.local_start_time.minute())
    }

    #[must_use]
    pub fn start_hhmm(&self) -> String {
        format_hhmm(self.local_start_time)
    }

    #[must_use]
    pub fn stop_hhmm(&self) -> Option<String> {
        self.local_stop_time.map(format_hhmm)
    }
}

/// An occurrence starting at a given instant, with the owner to remind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueOccurrence {
    pub owner_id: OwnerId,
    pub starts_at: DateTime<Utc>,
    pub occurrence: Occurrence,
}
