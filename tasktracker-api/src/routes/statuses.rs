/// Task status endpoints
///
/// Reads need a valid token; writes also need the account behind it to exist.

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::CurrentUser,
    routes::{AppJson, AppPath},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tasktracker_shared::models::{
    status::{Status, StatusInput},
    EntityId,
};

pub async fn list_statuses(State(state): State<AppState>) -> ApiResult<Json<Vec<Status>>> {
    Ok(Json(state.services.statuses.find_all().await?))
}

pub async fn get_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<Status>> {
    Ok(Json(state.services.statuses.find_by_id(id).await?))
}

pub async fn create_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppJson(input): AppJson<StatusInput>,
) -> ApiResult<(StatusCode, Json<Status>)> {
    let status = state.services.statuses.create(input).await?;
    tracing::debug!(actor_id = actor.id, status_id = status.id, "Status created by user");
    Ok((StatusCode::CREATED, Json(status)))
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<StatusInput>,
) -> ApiResult<Json<Status>> {
    tracing::debug!(actor_id = actor.id, status_id = id, "Update requested");
    Ok(Json(state.services.statuses.update_by_id(id, input).await?))
}

/// Refused with 409 while a task still references it
pub async fn delete_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<StatusCode> {
    tracing::debug!(actor_id = actor.id, status_id = id, "Delete requested");
    state.services.statuses.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
