/// Application state and router configuration
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Route Layout
///
/// ```text
/// GET  /health
/// {base}/login, {base}/refresh                public
/// {base}/users, {base}/users/:id              reads and registration public,
///                                             PUT/DELETE need the owner's token
/// {base}/statuses, {base}/labels, {base}/tasks bearer token required
/// ```
///
/// `{base}` is `API_BASE_PATH`, `/api` unless configured otherwise.

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tasktracker_shared::auth::middleware::create_jwt_middleware;
use tasktracker_shared::services::Services;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Entity services over the configured store
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(services: Services, config: Config) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret from config
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Token issuance and user registration/reads (public); user PUT/DELETE
    // authenticate through the CurrentUser extractor
    let public_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    // Everything else requires a bearer token
    let protected_routes = Router::new()
        .route(
            "/statuses",
            get(routes::statuses::list_statuses).post(routes::statuses::create_status),
        )
        .route(
            "/statuses/:id",
            get(routes::statuses::get_status)
                .put(routes::statuses::update_status)
                .delete(routes::statuses::delete_status),
        )
        .route(
            "/labels",
            get(routes::labels::list_labels).post(routes::labels::create_label),
        )
        .route(
            "/labels/:id",
            get(routes::labels::get_label)
                .put(routes::labels::update_label)
                .delete(routes::labels::delete_label),
        )
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(middleware::from_fn(create_jwt_middleware(
            state.jwt_secret().to_string(),
        )));

    let resource_routes = public_routes.merge(protected_routes);

    let base_path = state.config.api.base_path.clone();
    let app_routes = if base_path.is_empty() {
        health_routes.merge(resource_routes)
    } else {
        health_routes.nest(&base_path, resource_routes)
    };

    // Combine all routes with middleware stack
    app_routes
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
