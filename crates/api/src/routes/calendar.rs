//! Unified calendar endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::calendar::{CalendarEvent, CalendarQuery, DateRange};
use domain::services::calendar;
use domain::Session;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth};
use crate::middleware::metrics::record_calendar_events;

async fn events_for(
    state: &AppState,
    session: &Session,
    client_id: i64,
    query: CalendarQuery,
) -> Result<Vec<CalendarEvent>, ApiError> {
    let range = DateRange::new(query.start, query.end, state.config.calendar.max_range_days)?;
    let events = calendar::client_calendar(&*state.storage, session, client_id, range).await?;
    record_calendar_events(events.len());
    Ok(events)
}

/// Trainer view of a client's calendar.
///
/// GET /api/clients/:id/calendar?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn client_calendar(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
    QueryParams(query): QueryParams<CalendarQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    Ok(Json(events_for(&state, &session, client_id, query).await?))
}

/// The calling client's own calendar.
///
/// GET /api/me/calendar?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn my_calendar(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(query): QueryParams<CalendarQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    let client_id = session.require_client()?;
    Ok(Json(events_for(&state, &session, client_id, query).await?))
}
