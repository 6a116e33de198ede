/// Health check endpoint
///
/// Reports whether the server is up and whether the configured store
/// answers. Responds 200 when it does and 503 when it does not.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "postgres",
///   "database": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasktracker_shared::store::StoreResult;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Store backend name
    pub storage: String,

    /// Store connectivity
    pub database: String,
}

impl HealthResponse {
    /// Builds the report for a store ping outcome
    ///
    /// An unreachable store yields `503 Service Unavailable` with a
    /// `degraded` body.
    pub fn from_ping(backend: &str, ping: StoreResult<()>) -> (StatusCode, Self) {
        let (code, status, database) = match ping {
            Ok(()) => (StatusCode::OK, "healthy", "connected"),
            Err(e) => {
                tracing::warn!(error = %e, "Store ping failed");
                (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
            }
        };

        let report = Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: backend.to_string(),
            database: database.to_string(),
        };

        (code, report)
    }
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.services.store();
    let (code, report) = HealthResponse::from_ping(store.backend(), store.ping().await);

    (code, Json(report))
}
