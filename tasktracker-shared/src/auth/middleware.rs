/// Bearer-token authentication middleware for Axum
///
/// Validates the `Authorization: Bearer <token>` header and inserts the
/// token's [`Principal`] into the request extensions. The middleware does not
/// touch storage; turning the principal into a live account is left to
/// [`resolve_identity`](super::identity::resolve_identity), which handlers
/// reach through the API crate's `CurrentUser` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use tasktracker_shared::auth::identity::Principal;
/// use tasktracker_shared::auth::middleware::create_jwt_middleware;
///
/// async fn whoami(Extension(principal): Extension<Principal>) -> String {
///     principal.email
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_jwt_middleware(
///         "an-example-secret-of-at-least-32-bytes".to_string(),
///     )));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

use super::identity::Principal;
use super::jwt::{validate_access_token, JwtError};

/// Error type for authentication middleware
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a bearer credential
    #[error("{0}")]
    InvalidFormat(String),

    /// Bad signature, expired, wrong issuer or wrong token type
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": "unauthorized",
            "message": self.to_string(),
        });

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(body),
        )
            .into_response()
    }
}

/// Extracts the raw token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    Ok(token)
}

/// Validates a bearer access token into a principal
pub fn authenticate_bearer(headers: &HeaderMap, secret: &str) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(Principal::new(claims.sub))
}

/// JWT authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token fails validation.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = authenticate_bearer(req.headers(), &secret)?;

    tracing::debug!(email = %principal.email, "Bearer token accepted");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Boxed future returned by the middleware closure
pub type AuthFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

/// Captures the signing secret and returns a middleware function for
/// `axum::middleware::from_fn`
pub fn create_jwt_middleware(
    secret: String,
) -> impl Fn(Request, Next) -> AuthFuture + Clone + Send + Sync + 'static {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingCredentials));
        assert!(matches!(
            bearer_token(&headers_with("Basic abc")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_authenticate_bearer() {
        let token = create_token(&Claims::new("ada@example.com", TokenType::Access), SECRET).unwrap();
        let principal = authenticate_bearer(&headers_with(&format!("Bearer {}", token)), SECRET)
            .expect("valid token");
        assert_eq!(principal.email, "ada@example.com");

        let refresh = create_token(&Claims::new("ada@example.com", TokenType::Refresh), SECRET).unwrap();
        assert!(matches!(
            authenticate_bearer(&headers_with(&format!("Bearer {}", refresh)), SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_middleware_outlives_secret_source() {
        let router: axum::Router = {
            let config_secret = String::from(SECRET);
            axum::Router::new()
                .route("/", axum::routing::get(|| async { "ok" }))
                .route_layer(axum::middleware::from_fn(create_jwt_middleware(
                    config_secret.clone(),
                )))
        };

        fn assert_service<S: Clone + Send + Sync + 'static>(_: &S) {}
        assert_service(&router);
    }

    #[test]
    fn test_auth_error_into_response() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("x".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }
}
