//! Integration tests for the public surface and session handling.
//!
//! Tests cover:
//! - GET /api/health, /api/health/live, /api/health/ready
//! - POST /api/users (trainer registration)
//! - GET /api/users/:id
//! - Bearer session verification and role checks

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{
    client_token, create_client, create_test_app, create_trainer, expired_token,
    get_request_with_auth, json_request, parse_response_body, send,
};
use serde_json::json;
use shared::jwt::{Role, SessionKeys};
use tower::ServiceExt;

// =============================================================================
// Health probes
// =============================================================================

#[tokio::test]
async fn test_health_check_reports_memory_backend() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("x-request-id").is_some());

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["backend"], "memory");
    assert_eq!(body["storage"]["connected"], true);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = create_test_app().await;

    for (uri, expected) in [("/api/health/live", "alive"), ("/api/health/ready", "ready")] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], expected);
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-abc-123"
    );
}

// =============================================================================
// POST /api/users
// =============================================================================

#[tokio::test]
async fn test_register_trainer_hides_password() {
    let app = create_test_app().await;

    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "username": "coach_reyes",
            "password": "SecureP@ss123!",
            "name": "Dana Reyes",
            "email": "Dana@Example.com"
        }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "coach_reyes");
    assert_eq!(body["email"], "dana@example.com");
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = create_test_app().await;
    let payload = json!({
        "username": "coach_dup",
        "password": "SecureP@ss123!",
        "name": "First",
        "email": "first@example.com"
    });

    let (status, _) = send(&app, json_request(Method::POST, "/api/users", payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let again = json!({
        "username": "coach_dup",
        "password": "SecureP@ss123!",
        "name": "Second",
        "email": "second@example.com"
    });
    let (status, body) = send(&app, json_request(Method::POST, "/api/users", again)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let app = create_test_app().await;

    let request = json_request(
        Method::POST,
        "/api/users",
        json!({
            "username": "no spaces allowed",
            "password": "short",
            "name": "Somebody",
            "email": "not-an-email"
        }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"email"));
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"][0]["field"], "body");
}

// =============================================================================
// GET /api/users/:id
// =============================================================================

#[tokio::test]
async fn test_get_own_profile() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let (status, body) = send(
        &app,
        get_request_with_auth(&format!("/api/users/{}", trainer.id), &trainer.token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], trainer.id);
}

#[tokio::test]
async fn test_get_other_profile_not_found() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;

    let (status, body) = send(
        &app,
        get_request_with_auth(&format!("/api/users/{}", other.id), &trainer.token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

// =============================================================================
// Session verification
// =============================================================================

#[tokio::test]
async fn test_missing_token_unauthorized() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/clients")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token_unauthorized() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get_request_with_auth("/api/clients", "not.a.jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid session token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_unauthorized() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let foreign = SessionKeys::from_secret("some-other-secret", 0)
        .unwrap()
        .issue(trainer.id, Role::Trainer, 3600)
        .unwrap();

    let (status, _) = send(&app, get_request_with_auth("/api/clients", &foreign)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_unauthorized() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let token = expired_token(trainer.id, Role::Trainer);
    let (status, body) = send(&app, get_request_with_auth("/api/clients", &token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session expired");
}

#[tokio::test]
async fn test_client_session_forbidden_on_trainer_routes() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let (status, body) = send(
        &app,
        get_request_with_auth("/api/clients", &client_token(client_id)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_trainer_session_forbidden_on_client_routes() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let (status, _) = send(
        &app,
        get_request_with_auth("/api/me/goals", &trainer.token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
