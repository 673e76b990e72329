//! Models for the event cancellation table.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use kalends_core::model::CancellationRecord;

use crate::db::schema::event_cancellation;

/// Cancellation row: suppresses one local date of a recurring definition.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = event_cancellation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CancellationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub cancel_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_cancellation)]
pub struct NewCancellationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub cancel_date: NaiveDate,
}

impl From<CancellationRow> for CancellationRecord {
    fn from(row: CancellationRow) -> Self {
        Self {
            event_id: row.event_id,
            cancel_date: row.cancel_date,
        }
    }
}
