/// Task endpoints
///
/// All task routes need a bearer token. The acting user becomes the author on
/// create, and only the author may replace or delete a task.
///
/// # Filtering
///
/// `GET /tasks` accepts any combination of:
///
/// ```text
/// taskStatusId=1,2   authorId=3   executorId=4   labelIds=5,6
/// taskStatus.name=progress   labels.name=bug
/// author.email=... author.firstName=... author.lastName=...
/// executor.email=... executor.firstName=... executor.lastName=...
/// ```
///
/// Id lists match any of the given ids, except `labelIds`, which requires
/// every listed label. Text filters are case-insensitive substring matches.

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::CurrentUser,
    routes::{AppJson, AppPath},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tasktracker_shared::models::{
    task::{Task, TaskInput},
    EntityId,
};

/// `GET /tasks?...`
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<Task>>> {
    let binder = state.services.tasks.filter_binder();
    let predicate = binder.bind(params)?;
    tracing::debug!(
        mode = %binder.mode(),
        conditions = predicate.conditions().len(),
        "Listing tasks"
    );

    Ok(Json(state.services.tasks.find_all(&predicate).await?))
}

/// `GET /tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.find_by_id(id).await?))
}

/// `POST /tasks`; any author supplied by the client is ignored
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppJson(input): AppJson<TaskInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.services.tasks.create(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/:id`, author only
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<TaskInput>,
) -> ApiResult<Json<Task>> {
    Ok(Json(
        state.services.tasks.update_by_id(&actor, id, input).await?,
    ))
}

/// `DELETE /tasks/:id`, author only
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<StatusCode> {
    state.services.tasks.delete_by_id(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
