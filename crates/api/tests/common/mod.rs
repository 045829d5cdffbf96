//! Common test utilities for integration tests.
//!
//! The router is driven in-process over a seeded [`MemoryStorage`], with
//! session tokens minted from the same secret the app verifies with.

// Not every integration test uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::MemoryStorage;
use serde_json::{json, Value};
use shared::jwt::{Role, SessionKeys};
use std::sync::Arc;
use tower::ServiceExt;
use trainer_hub_api::{
    app::{create_app, AppState},
    config::{
        AuthConfig, CalendarConfig, Config, DatabaseConfig, LoggingConfig, SecurityConfig,
        ServerConfig, StorageBackend, StorageConfig,
    },
};

pub const TEST_SECRET: &str = "integration-test-session-secret";

/// Test configuration for the in-memory backend.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        auth: AuthConfig {
            session_secret: TEST_SECRET.to_string(),
            leeway_secs: 0,
        },
        calendar: CalendarConfig { max_range_days: 366 },
    }
}

/// Create the router over a fresh storage seeded with the starter library.
pub async fn create_test_app() -> Router {
    create_test_app_with(test_config()).await
}

pub async fn create_test_app_with(config: Config) -> Router {
    let storage = MemoryStorage::new();
    storage.seed_starter_library().await;
    let state = AppState::new(config, Arc::new(storage)).expect("Failed to build app state");
    create_app(state)
}

fn keys() -> SessionKeys {
    SessionKeys::from_secret(TEST_SECRET, 0).expect("Failed to build session keys")
}

pub fn trainer_token(trainer_id: i64) -> String {
    keys()
        .issue(trainer_id, Role::Trainer, 3600)
        .expect("Failed to issue trainer token")
}

pub fn client_token(client_id: i64) -> String {
    keys()
        .issue(client_id, Role::Client, 3600)
        .expect("Failed to issue client token")
}

pub fn expired_token(subject_id: i64, role: Role) -> String {
    keys()
        .issue(subject_id, role, -120)
        .expect("Failed to issue expired token")
}

/// Create a GET request with a bearer token.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Create a DELETE request with a bearer token.
pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Create a JSON request with a bearer token.
pub fn json_request_with_auth(method: Method, uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create an unauthenticated JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Parse a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse response body: {:?}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// Send a request and return status plus parsed body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, parse_response_body(response).await)
}

/// A registered trainer and a session token for them.
pub struct TestTrainer {
    pub id: i64,
    pub token: String,
}

/// Register a trainer profile through the API and mint a session for it.
pub async fn create_trainer(app: &Router) -> TestTrainer {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email: String = SafeEmail().fake();
    let name: String = Name().fake();
    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "username": format!("coach_{}", &suffix[..12]),
            "password": "SecureP@ss123!",
            "name": name,
            "email": format!("{}.{}", &suffix[..8], email),
        }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "trainer registration failed: {}", body);

    let id = body["id"].as_i64().expect("Missing user id");
    TestTrainer {
        id,
        token: trainer_token(id),
    }
}

/// Create a client on the trainer's roster, returning its id.
pub async fn create_client(app: &Router, trainer: &TestTrainer) -> i64 {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let request = json_request_with_auth(
        Method::POST,
        "/api/clients",
        json!({ "name": name, "email": email }),
        &trainer.token,
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "client creation failed: {}", body);
    body["id"].as_i64().expect("Missing client id")
}

/// Id of a seeded global exercise template by name.
pub async fn global_exercise_id(app: &Router, trainer: &TestTrainer, name: &str) -> i64 {
    let (status, body) = send(
        app,
        get_request_with_auth("/api/exercise-templates", &trainer.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == name && t["trainer_id"].is_null())
        .and_then(|t| t["id"].as_i64())
        .unwrap_or_else(|| panic!("No global exercise named {}", name))
}
