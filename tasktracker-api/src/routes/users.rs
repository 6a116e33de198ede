/// User endpoints
///
/// Listing, reading and registration are public. Replacing or deleting an
/// account requires a bearer token for that same account.

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
    user::{User, UserInput},
    EntityId,
};

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.find_all().await?))
}

/// `GET /users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.users.find_by_id(id).await?))
}

/// `POST /users`, open registration
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<UserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.services.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/:id`, owner only
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<UserInput>,
) -> ApiResult<Json<User>> {
    let user = state.services.users.update_by_id(&actor, id, input).await?;
    Ok(Json(user))
}

/// `DELETE /users/:id`, owner only
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<StatusCode> {
    state.services.users.delete_by_id(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
