/// Current-user extraction
///
/// Handlers that act on behalf of a user take a [`CurrentUser`] argument. On
/// routes behind the JWT layer the principal is already in the request
/// extensions; elsewhere the bearer header is validated here. Either way the
/// principal's email is then resolved against the store, so a token whose
/// account has since been deleted is rejected with 401.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tasktracker_shared::auth::identity::{resolve_identity, Principal};
use tasktracker_shared::auth::middleware::authenticate_bearer;
use tasktracker_shared::models::user::User;

use crate::{app::AppState, error::ApiError};

/// The authenticated account making the request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<Principal>() {
            Some(principal) => principal.clone(),
            None => authenticate_bearer(&parts.headers, state.jwt_secret())?,
        };

        let user = resolve_identity(state.services.store().as_ref(), &principal).await?;
        Ok(CurrentUser(user))
    }
}
