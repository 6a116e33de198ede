/// Label endpoints; bearer token required, writes resolve the acting user

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
    label::{Label, LabelInput},
    EntityId,
};

pub async fn list_labels(State(state): State<AppState>) -> ApiResult<Json<Vec<Label>>> {
    Ok(Json(state.services.labels.find_all().await?))
}

pub async fn get_label(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<Label>> {
    Ok(Json(state.services.labels.find_by_id(id).await?))
}

pub async fn create_label(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppJson(input): AppJson<LabelInput>,
) -> ApiResult<(StatusCode, Json<Label>)> {
    let label = state.services.labels.create(input).await?;
    tracing::debug!(actor_id = actor.id, label_id = label.id, "Label created by user");
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn update_label(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<LabelInput>,
) -> ApiResult<Json<Label>> {
    tracing::debug!(actor_id = actor.id, label_id = id, "Update requested");
    Ok(Json(state.services.labels.update_by_id(id, input).await?))
}

/// Refused with 409 while a task still references it
pub async fn delete_label(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<StatusCode> {
    tracing::debug!(actor_id = actor.id, label_id = id, "Delete requested");
    state.services.labels.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
