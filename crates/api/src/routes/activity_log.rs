//! Activity log endpoint handlers.
//!
//! Clients record what they did with each calendar occurrence; trainers
//! read those records per client.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::activity_log::{
    ActivityLogEntry, ActivityLogLookup, ActivityLogRange, UpsertActivityLogRequest,
};
use domain::services::activity_log;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth, ValidatedJson};
use crate::middleware::metrics::record_activity_logged;

/// Insert or update the caller's entry for one occurrence.
///
/// PUT /api/me/activity-log
pub async fn upsert_activity_log(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<UpsertActivityLogRequest>,
) -> Result<Json<ActivityLogEntry>, ApiError> {
    let entry = activity_log::upsert(&*state.storage, &session, request).await?;
    record_activity_logged(entry.status.as_str());
    info!(
        activity_log_id = entry.id,
        client_id = entry.client_id,
        original_item_id = %entry.original_item_id,
        status = entry.status.as_str(),
        "Activity logged"
    );
    Ok(Json(entry))
}

/// Single entry for an occurrence, or `null`.
///
/// GET /api/me/activity-log?original_item_id=&item_type=
pub async fn find_activity_log(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(lookup): QueryParams<ActivityLogLookup>,
) -> Result<Json<Option<ActivityLogEntry>>, ApiError> {
    Ok(Json(
        activity_log::find(&*state.storage, &session, &lookup).await?,
    ))
}

/// GET /api/clients/:id/activity-log?start=&end=
pub async fn list_client_activity_logs(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
    QueryParams(range): QueryParams<ActivityLogRange>,
) -> Result<Json<Vec<ActivityLogEntry>>, ApiError> {
    Ok(Json(
        activity_log::list(&*state.storage, &session, client_id, &range).await?,
    ))
}
