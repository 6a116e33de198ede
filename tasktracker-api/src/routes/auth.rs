/// Token endpoints
///
/// # Endpoints
///
/// - `POST /login` - Exchange email and password for tokens
/// - `POST /refresh` - Exchange a refresh token for a new access token
///
/// Registration is `POST /users`.

use crate::{app::AppState, error::ApiResult, routes::AppJson};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tasktracker_shared::{auth::jwt, validation};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// User ID
    pub user_id: i64,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Login handler
///
/// Unknown email and wrong password both answer 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validation::finish(validation::collect_violations(req.validate()))?;

    let user = state
        .services
        .users
        .authenticate(&req.email, &req.password)
        .await?;

    let access_claims = jwt::Claims::new(user.email.clone(), jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.email.clone(), jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        access_token,
        refresh_token,
    }))
}

/// Refresh handler
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
