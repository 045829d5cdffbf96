//! Integration tests for trainer-owned records.
//!
//! Tests cover:
//! - /api/alerts (create, unread filter, mark read, delete)
//! - /api/branding (upsert, own, by trainer id)
//! - /api/appointments (create, list with client names, update, delete)
//! - /api/payments and /api/progress
//! - /api/plans and /api/client-plans

mod common;

use axum::http::{Method, StatusCode};
use common::{
    client_token, create_client, create_test_app, create_trainer, delete_request_with_auth,
    get_request_with_auth, json_request_with_auth, send,
};
use serde_json::json;

// =============================================================================
// Alerts
// =============================================================================

#[tokio::test]
async fn test_alert_unread_filter_and_mark_read() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let mut ids = Vec::new();
    for title in ["Missed session", "Payment overdue"] {
        let request = json_request_with_auth(
            Method::POST,
            "/api/alerts",
            json!({ "client_id": client_id, "title": title, "message": "Follow up" }),
            &trainer.token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["is_read"], false);
        ids.push(body["id"].clone());
    }

    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/alerts/{}/read", ids[0]),
        json!({}),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);

    let (_, all) = send(&app, get_request_with_auth("/api/alerts", &trainer.token)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, unread) = send(
        &app,
        get_request_with_auth("/api/alerts?unread_only=true", &trainer.token),
    )
    .await;
    let unread = unread.as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["id"], ids[1]);

    let uri = format!("/api/alerts/{}", ids[1]);
    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_alert_for_foreign_client_not_found() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;
    let foreign_client = create_client(&app, &other).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/alerts",
        json!({ "client_id": foreign_client, "title": "Hi", "message": "There" }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Branding
// =============================================================================

#[tokio::test]
async fn test_branding_upsert_keeps_single_row() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let (status, _) = send(&app, get_request_with_auth("/api/branding", &trainer.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = json_request_with_auth(
        Method::POST,
        "/api/branding",
        json!({ "primary_color": "#1A2B3C" }),
        &trainer.token,
    );
    let (status, first) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK, "{}", first);
    assert_eq!(first["message_tone"], "professional");

    let request = json_request_with_auth(
        Method::POST,
        "/api/branding",
        json!({ "primary_color": "#FFFFFF", "message_tone": "motivational" }),
        &trainer.token,
    );
    let (status, second) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["primary_color"], "#FFFFFF");
    assert_eq!(second["message_tone"], "motivational");
}

#[tokio::test]
async fn test_branding_rejects_bad_colour() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/branding",
        json!({ "secondary_color": "blue" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "secondary_color");
}

#[tokio::test]
async fn test_client_reads_own_trainers_branding() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/branding",
        json!({ "message_tone": "friendly" }),
        &trainer.token,
    );
    send(&app, request).await;

    let token = client_token(client_id);
    let (status, body) = send(
        &app,
        get_request_with_auth(&format!("/api/branding/{}", trainer.id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message_tone"], "friendly");

    let (status, _) = send(
        &app,
        get_request_with_auth(&format!("/api/branding/{}", other.id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Appointments
// =============================================================================

#[tokio::test]
async fn test_appointments_list_with_client_names() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/clients",
        json!({ "name": "Maya Chen", "email": "maya@example.com" }),
        &trainer.token,
    );
    let (_, client) = send(&app, request).await;

    for (start, end) in [
        ("2024-06-07T15:00:00Z", "2024-06-07T16:00:00Z"),
        ("2024-06-05T09:00:00Z", "2024-06-05T09:30:00Z"),
    ] {
        let request = json_request_with_auth(
            Method::POST,
            "/api/appointments",
            json!({
                "client_id": client["id"],
                "title": "Session",
                "appointment_type": "in_person",
                "start_time": start,
                "end_time": end
            }),
            &trainer.token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, list) = send(&app, get_request_with_auth("/api/appointments", &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["client_name"], "Maya Chen");
    assert_eq!(list[0]["start_time"], "2024-06-05T09:00:00Z");
}

#[tokio::test]
async fn test_appointment_window_checked_on_create_and_update() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        json!({
            "client_id": client_id,
            "title": "Zero length",
            "start_time": "2024-06-05T09:00:00Z",
            "end_time": "2024-06-05T09:00:00Z"
        }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "end_time");

    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        json!({
            "client_id": client_id,
            "title": "Check-in",
            "start_time": "2024-06-05T09:00:00Z",
            "end_time": "2024-06-05T10:00:00Z"
        }),
        &trainer.token,
    );
    let (_, created) = send(&app, request).await;
    let uri = format!("/api/appointments/{}", created["id"]);

    // Moving only the start past the existing end is rejected
    let request = json_request_with_auth(
        Method::PATCH,
        &uri,
        json!({ "start_time": "2024-06-05T11:00:00Z" }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = json_request_with_auth(
        Method::PATCH,
        &uri,
        json!({ "status": "Completed" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Payments and progress
// =============================================================================

#[tokio::test]
async fn test_payments_filter_and_update() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let first = create_client(&app, &trainer).await;
    let second = create_client(&app, &trainer).await;

    for (client_id, amount) in [(first, 5000), (second, 7500)] {
        let request = json_request_with_auth(
            Method::POST,
            "/api/payments",
            json!({ "client_id": client_id, "amount": amount, "description": "Monthly package" }),
            &trainer.token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["is_paid"], false);
    }

    let (_, all) = send(&app, get_request_with_auth("/api/payments", &trainer.token)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, only_first) = send(
        &app,
        get_request_with_auth(&format!("/api/payments?client_id={}", first), &trainer.token),
    )
    .await;
    let only_first = only_first.as_array().unwrap();
    assert_eq!(only_first.len(), 1);
    assert_eq!(only_first[0]["amount"], 5000);

    let request = json_request_with_auth(
        Method::PATCH,
        &format!("/api/payments/{}", only_first[0]["id"]),
        json!({ "is_paid": true }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_paid"], true);
}

#[tokio::test]
async fn test_negative_payment_rejected() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/payments",
        json!({ "client_id": client_id, "amount": -1, "description": "Refund" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "amount");
}

#[tokio::test]
async fn test_progress_entries_require_object_metrics() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/progress",
        json!({ "client_id": client_id, "metrics": "{\"bench_kg\": 60}" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["metrics"]["bench_kg"], 60);

    let request = json_request_with_auth(
        Method::POST,
        "/api/progress",
        json!({ "client_id": client_id, "metrics": 42 }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = send(
        &app,
        get_request_with_auth(&format!("/api/progress?client_id={}", client_id), &trainer.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/progress/{}", body["id"]);
    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Free-form plans
// =============================================================================

#[tokio::test]
async fn test_plan_assignment_lifecycle() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plans",
        json!({
            "name": "Hybrid Block",
            "type": "combined",
            "content": { "weeks": 4, "focus": "conditioning" }
        }),
        &trainer.token,
    );
    let (status, plan) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", plan);
    assert_eq!(plan["type"], "combined");

    let request = json_request_with_auth(
        Method::PATCH,
        &format!("/api/plans/{}", plan["id"]),
        json!({ "description": "Four week block" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Four week block");

    let request = json_request_with_auth(
        Method::POST,
        "/api/client-plans",
        json!({ "client_id": client_id, "plan_id": plan["id"], "start_date": "2024-06-01" }),
        &trainer.token,
    );
    let (status, assignment) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", assignment);
    assert_eq!(assignment["is_active"], true);

    let list_uri = format!("/api/client-plans?client_id={}", client_id);
    let (_, list) = send(&app, get_request_with_auth(&list_uri, &trainer.token)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let request = json_request_with_auth(
        Method::PATCH,
        &format!("/api/client-plans/{}", assignment["id"]),
        json!({ "is_active": false }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    // Deleting the plan removes its assignments
    let (status, _) = send(
        &app,
        delete_request_with_auth(&format!("/api/plans/{}", plan["id"]), &trainer.token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, get_request_with_auth(&list_uri, &trainer.token)).await;
    assert_eq!(list, json!([]));
}
