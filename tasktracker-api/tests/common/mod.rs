/// Common test utilities for router tests
///
/// Builds the full router over an in-memory store so tests need neither a
/// database nor a network listener. Requests are driven through
/// `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tasktracker_api::app::{build_router, AppState};
use tasktracker_api::config::Config;
use tasktracker_shared::auth::jwt::{create_token, Claims, TokenType};
use tasktracker_shared::auth::password::Argon2Hasher;
use tasktracker_shared::models::user::{User, UserInput};
use tasktracker_shared::services::Services;
use tasktracker_shared::store::memory::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "router-test-secret-at-least-32-bytes";

/// Test context containing the router and its services
pub struct TestContext {
    pub app: Router,
    pub services: Services,
    pub config: Config,
}

impl TestContext {
    /// Default configuration: lenient filters and label resolution
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Configuration with extra environment variables
    pub fn with_env(extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("STORAGE_BACKEND".to_string(), "memory".to_string()),
            ("JWT_SECRET".to_string(), TEST_SECRET.to_string()),
        ]);
        for (key, value) in extra {
            vars.insert(key.to_string(), value.to_string());
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config");

        // Cheap Argon2 parameters keep the suite fast
        let hasher = Argon2Hasher::with_params(1024, 1, 1).expect("valid params");
        let services = Services::new(
            Arc::new(MemoryStore::new()),
            Arc::new(hasher),
            config.service_policy(),
        );

        let app = build_router(AppState::new(services.clone(), config.clone()));

        Self {
            app,
            services,
            config,
        }
    }

    /// Registers a user directly through the service
    pub async fn register(&self, first_name: &str, email: &str) -> User {
        self.services
            .users
            .create(UserInput {
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                email: email.to_string(),
                password: "secret".to_string(),
            })
            .await
            .expect("user registered")
    }

    /// Access token for `user`
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::new(user.email.clone(), TokenType::Access);
        create_token(&claims, &self.config.jwt.secret).expect("token created")
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request built");

        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Creates a status over HTTP and returns its id
    pub async fn create_status(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/statuses", Some(token), serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().expect("status id")
    }

    /// Creates a label over HTTP and returns its id
    pub async fn create_label(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/labels", Some(token), serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().expect("label id")
    }
}

/// Sorted `id` fields of a JSON array
pub fn ids(body: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    ids.sort_unstable();
    ids
}
