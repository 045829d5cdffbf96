//! Client roster endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::client::{
    Client, CreateClientRequest, ListClientsResponse, UpdateClientRequest,
};
use domain::services::clients;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{SessionAuth, ValidatedJson};

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = clients::create(&*state.storage, &session, request).await?;
    info!(
        client_id = client.id,
        trainer_id = client.trainer_id,
        "Client created"
    );
    Ok((StatusCode::CREATED, Json(client)))
}

/// List the trainer's clients, ordered by name.
///
/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<ListClientsResponse>, ApiError> {
    let data = clients::list(&*state.storage, &session).await?;
    let total = data.len();
    Ok(Json(ListClientsResponse { data, total }))
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(clients::get(&*state.storage, &session, id).await?))
}

/// PATCH /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    let client = clients::update(&*state.storage, &session, id, patch).await?;
    info!(client_id = client.id, "Client updated");
    Ok(Json(client))
}

/// Soft delete: the client is kept but marked inactive.
///
/// POST /api/clients/:id/archive
pub async fn archive_client(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    let client = clients::archive(&*state.storage, &session, id).await?;
    info!(client_id = client.id, "Client archived");
    Ok(Json(client))
}

/// Hard delete, cascading to everything the client owns.
///
/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    clients::delete(&*state.storage, &session, id).await?;
    info!(client_id = id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
