//! Query composition for `event_definition`.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use kalends_core::model::{CandidateQuery, EventDefinition, NewEventDefinition, OwnerId};

use crate::db::connection::DbConnection;
use crate::db::enums::RecurrenceToken;
use crate::db::schema::event_definition;
use crate::error::DbResult;
use crate::model::event::{EventRow, NewEventRow};

type Predicate = Box<dyn BoxableExpression<event_definition::table, Pg, SqlType = Bool>>;

fn to_smallints<T: Copy + Into<u8>>(values: &std::collections::BTreeSet<T>) -> Vec<i16> {
    values.iter().map(|&v| i16::from(Into::<u8>::into(v))).collect()
}

/// ## Summary
/// Translates the recurrence bands of a candidate query into one SQL predicate.
///
/// Mirrors `CandidateQuery::matches`.
fn recurrence_bands(query: &CandidateQuery) -> Predicate {
    let single: Predicate = Box::new(
        event_definition::recurrence
            .eq(RecurrenceToken::Never)
            .and(event_definition::start_at.ge(query.window_start)),
    );

    let daily: Predicate = Box::new(event_definition::recurrence.eq(RecurrenceToken::Daily));

    let weekly: Predicate = match &query.weekdays {
        Some(days) => Box::new(
            event_definition::weekly_day
                .assume_not_null()
                .eq_any(to_smallints(days)),
        ),
        None => Box::new(event_definition::weekly_day.is_not_null()),
    };

    let monthly: Predicate = match &query.monthly_days {
        Some(days) => Box::new(
            event_definition::monthly_day
                .assume_not_null()
                .eq_any(to_smallints(days)),
        ),
        None => Box::new(event_definition::monthly_day.is_not_null()),
    };

    let annual_month: Predicate = Box::new(
        event_definition::annual_month
            .assume_not_null()
            .eq_any(to_smallints(&query.annual_months)),
    );
    let annual: Predicate = match &query.annual_days {
        Some(days) => Box::new(
            annual_month.and(
                event_definition::annual_day
                    .assume_not_null()
                    .eq_any(to_smallints(days)),
            ),
        ),
        None => annual_month,
    };

    Box::new(single.or(daily).or(weekly).or(monthly).or(annual))
}

/// ## Summary
/// Loads every definition of the owner that may produce an occurrence in
/// the query window.
///
/// ## Errors
/// Returns an error if the query fails or a row violates the recurrence shape.
#[tracing::instrument(skip(conn, query), fields(owner_id = query.owner_id))]
pub async fn load_candidates(
    conn: &mut DbConnection<'_>,
    query: &CandidateQuery,
) -> DbResult<Vec<EventDefinition>> {
    let rows = event_definition::table
        .filter(event_definition::owner_id.eq(query.owner_id))
        .filter(event_definition::start_at.le(query.window_end))
        .filter(recurrence_bands(query))
        .select(EventRow::as_select())
        .load::<EventRow>(conn)
        .await?;

    tracing::trace!(candidate_count = rows.len(), "Loaded candidate definitions");

    rows.into_iter().map(EventDefinition::try_from).collect()
}

/// ## Summary
/// Loads the definitions of every owner that may start inside `[from, to]`:
/// recurring ones that started by `to` and single ones starting in the range.
///
/// ## Errors
/// Returns an error if the query fails or a row violates the recurrence shape.
#[tracing::instrument(skip(conn))]
pub async fn load_due(
    conn: &mut DbConnection<'_>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> DbResult<Vec<EventDefinition>> {
    let rows = event_definition::table
        .filter(event_definition::start_at.le(to))
        .filter(
            event_definition::recurrence
                .ne(RecurrenceToken::Never)
                .or(event_definition::start_at.ge(from)),
        )
        .order((event_definition::owner_id, event_definition::start_at))
        .select(EventRow::as_select())
        .load::<EventRow>(conn)
        .await?;

    tracing::trace!(candidate_count = rows.len(), "Loaded due definitions");

    rows.into_iter().map(EventDefinition::try_from).collect()
}

/// ## Summary
/// Finds a definition by id, only if it belongs to `owner_id`.
///
/// ## Errors
/// Returns an error if the query fails or the row is corrupt.
pub async fn find_for_owner(
    conn: &mut DbConnection<'_>,
    owner_id: OwnerId,
    id: Uuid,
) -> DbResult<Option<EventDefinition>> {
    let row = event_definition::table
        .filter(event_definition::id.eq(id))
        .filter(event_definition::owner_id.eq(owner_id))
        .select(EventRow::as_select())
        .first::<EventRow>(conn)
        .await
        .optional()?;

    row.map(EventDefinition::try_from).transpose()
}

/// ## Summary
/// Inserts a definition.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, def: &NewEventDefinition) -> DbResult<Uuid> {
    let id = diesel::insert_into(event_definition::table)
        .values(NewEventRow::from(def))
        .returning(event_definition::id)
        .get_result::<Uuid>(conn)
        .await?;
    Ok(id)
}

/// ## Summary
/// Deletes a definition; its cancellations go with it through the foreign key.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> DbResult<usize> {
    let count = diesel::delete(event_definition::table.filter(event_definition::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(count)
}
