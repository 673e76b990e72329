//! Query composition for `event_cancellation`.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use kalends_core::model::CancellationRecord;

use crate::db::connection::DbConnection;
use crate::db::schema::event_cancellation;
use crate::error::DbResult;
use crate::model::cancellation::{CancellationRow, NewCancellationRow};

/// ## Summary
/// Loads all cancellations recorded against any of `event_ids`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn load_for_events(
    conn: &mut DbConnection<'_>,
    event_ids: &[Uuid],
) -> DbResult<Vec<CancellationRecord>> {
    if event_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = event_cancellation::table
        .filter(event_cancellation::event_id.eq_any(event_ids))
        .select(CancellationRow::as_select())
        .load::<CancellationRow>(conn)
        .await?;

    Ok(rows.into_iter().map(CancellationRecord::from).collect())
}

/// ## Summary
/// Records a cancellation. Cancelling an already cancelled date is a no-op.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    event_id: Uuid,
    cancel_date: NaiveDate,
) -> DbResult<()> {
    let _inserted = diesel::insert_into(event_cancellation::table)
        .values(NewCancellationRow {
            id: Uuid::now_v7(),
            event_id,
            cancel_date,
        })
        .on_conflict((event_cancellation::event_id, event_cancellation::cancel_date))
        .do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}
