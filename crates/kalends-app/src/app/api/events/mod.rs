use std::str::FromStr;

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use kalends_core::constants::EVENTS_ROUTE_COMPONENT;
use kalends_service::calendar::CreateEventInput;

use crate::calendar_handler::get_calendar_from_depot;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::get_owner_from_depot;

mod types;


use types::{CreatedResponse, DeleteResponse, MonthResponse, OccurrenceResponse};

/// Reads a required query parameter.
fn required_query<T: FromStr>(req: &Request, name: &str) -> AppResult<T> {
    let raw = req
        .query::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing query parameter {name}")))?;
    raw.trim()
        .parse()
        .map_err(|_err| AppError::BadRequest(format!("invalid query parameter {name}: {raw:?}")))
}

/// ## Summary
/// GET /api/events/month?year=&month= - per-day occurrence counts.
///
/// ## Errors
/// 400 for a malformed or out-of-range year/month, 404 if the owner has no
/// profile, 503 if storage fails.
#[handler]
async fn month_counts(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MonthResponse>> {
    let owner_id = get_owner_from_depot(depot)?;
    let year = required_query(req, "year")?;
    let month = required_query(req, "month")?;

    let counts = get_calendar_from_depot(depot)?
        .month(owner_id, year, month)
        .await?;
    Ok(Json(counts.into()))
}

/// ## Summary
/// GET /api/events/day?year=&month=&day= - occurrences ordered by start time.
///
/// ## Errors
/// 400 for a date that does not exist, 404 if the owner has no profile, 503
/// if storage fails.
#[handler]
async fn day_occurrences(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<OccurrenceResponse>>> {
    let owner_id = get_owner_from_depot(depot)?;
    let year = required_query(req, "year")?;
    let month = required_query(req, "month")?;
    let day = required_query(req, "day")?;

    let occurrences = get_calendar_from_depot(depot)?
        .day(owner_id, year, month, day)
        .await?;
    Ok(Json(occurrences.into_iter().map(Into::into).collect()))
}

/// ## Summary
/// GET /api/events/upcoming - the owner's next occurrences, soonest first.
///
/// ## Errors
/// 404 if the owner has no profile, 503 if storage fails.
#[handler]
async fn upcoming_occurrences(depot: &mut Depot) -> AppResult<Json<Vec<OccurrenceResponse>>> {
    let owner_id = get_owner_from_depot(depot)?;
    let occurrences = get_calendar_from_depot(depot)?
        .upcoming(owner_id, chrono::Utc::now())
        .await?;
    Ok(Json(occurrences.into_iter().map(Into::into).collect()))
}

/// ## Summary
/// POST /api/events - creates an event and its participant copies.
///
/// ## Errors
/// 400 for an invalid body, 404 if the owner has no profile, 500 if only
/// some participant copies could be stored.
#[handler]
async fn create_event(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<CreatedResponse>> {
    let owner_id = get_owner_from_depot(depot)?;
    let input: CreateEventInput = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse create event request");
        AppError::BadRequest("invalid request body".to_string())
    })?;

    let id = get_calendar_from_depot(depot)?
        .create_event(owner_id, &input)
        .await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(CreatedResponse { id: id.to_string() }))
}

/// ## Summary
/// DELETE /api/events/{id}?date=YYYY-MM-DD - deletes the event, or cancels
/// the occurrence on `date` when the event recurs.
///
/// ## Errors
/// 400 for a malformed id or date, 404 if the event is not the owner's.
#[handler]
async fn delete_event(req: &mut Request, depot: &mut Depot) -> AppResult<Json<DeleteResponse>> {
    let owner_id = get_owner_from_depot(depot)?;
    let raw_id = req.param::<String>("id").unwrap_or_default();
    let event_id = uuid::Uuid::parse_str(&raw_id)
        .map_err(|_err| AppError::BadRequest(format!("invalid event id {raw_id:?}")))?;
    let date = req.query::<String>("date");

    let outcome = get_calendar_from_depot(depot)?
        .delete_event(owner_id, event_id, date.as_deref())
        .await?;
    Ok(Json(outcome.into()))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .post(create_event)
        .push(Router::with_path("month").get(month_counts))
        .push(Router::with_path("day").get(day_occurrences))
        .push(Router::with_path("upcoming").get(upcoming_occurrences))
        .push(Router::with_path("{id}").delete(delete_event))
}
