use std::collections::BTreeMap;

use serde::Serialize;

use kalends_core::model::Occurrence;
use kalends_core::util::datetime::format_iso_date;
use kalends_service::calendar::{DeleteOutcome, MonthCounts};

/// Occurrence counts keyed by day of month.
#[derive(Debug, Serialize)]
pub struct MonthResponse {
    pub days: BTreeMap<u32, u32>,
}

impl From<MonthCounts> for MonthResponse {
    fn from(counts: MonthCounts) -> Self {
        Self {
            days: counts.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OccurrenceResponse {
    pub id: String,
    pub description: String,
    pub start_time: String,
    pub stop_time: Option<String>,
    pub date: String,
    pub recurrent: &'static str,
    pub single_event: bool,
}

impl From<Occurrence> for OccurrenceResponse {
    fn from(occurrence: Occurrence) -> Self {
        Self {
            id: occurrence.event_id.to_string(),
            start_time: occurrence.start_hhmm(),
            stop_time: occurrence.stop_hhmm(),
            date: format_iso_date(occurrence.local_date),
            recurrent: occurrence.recurrence.as_str(),
            single_event: occurrence.is_single,
            description: occurrence.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Either `{"deleted": true}` or `{"canceled": true}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteResponse {
    Deleted(bool),
    Canceled(bool),
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Deleted => Self::Deleted(true),
            DeleteOutcome::Canceled => Self::Canceled(true),
        }
    }
}
