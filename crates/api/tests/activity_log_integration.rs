//! Integration tests for client activity logs.
//!
//! Tests cover:
//! - PUT /api/me/activity-log (insert-or-update)
//! - GET /api/me/activity-log (lookup by occurrence)
//! - GET /api/clients/:id/activity-log (trainer view)

mod common;

use axum::http::{Method, StatusCode};
use common::{
    client_token, create_client, create_test_app, create_trainer, get_request_with_auth,
    json_request_with_auth, send,
};
use serde_json::json;

#[tokio::test]
async fn test_upsert_inserts_then_updates_same_entry() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let token = client_token(client_id);

    let first = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "fit-item-7-20240603",
            "item_type": "fitness",
            "title": "Back Squat",
            "scheduled_date": "2024-06-03",
            "status": "partially_completed",
            "completion_details": { "sets_done": 2 }
        }),
        &token,
    );
    let (status, created) = send(&app, first).await;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["client_id"], client_id);
    assert_eq!(created["status"], "partially_completed");
    assert_eq!(created["source_item_table"], "fitness_plan_items");
    assert_eq!(created["completion_details"]["sets_done"], 2);

    let second = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "fit-item-7-20240603",
            "item_type": "fitness",
            "title": "Renamed",
            "scheduled_date": "2024-06-03",
            "status": "completed",
            "client_notes": "Felt strong",
            "completion_details": "{\"sets_done\": 4}"
        }),
        &token,
    );
    let (status, updated) = send(&app, second).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["client_notes"], "Felt strong");
    assert_eq!(updated["completion_details"]["sets_done"], 4);
    // Identity fields are fixed by the first write
    assert_eq!(updated["title"], "Back Squat");
}

#[tokio::test]
async fn test_same_item_id_with_other_type_is_separate() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let token = client_token(client_id);

    let mut ids = Vec::new();
    for item_type in ["fitness", "nutrition"] {
        let request = json_request_with_auth(
            Method::PUT,
            "/api/me/activity-log",
            json!({
                "original_item_id": "shared-id",
                "item_type": item_type,
                "scheduled_date": "2024-06-03",
                "status": "completed"
            }),
            &token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["id"].as_i64().unwrap());
    }

    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_upsert_rejects_non_object_details() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "appt-3",
            "item_type": "appointment",
            "scheduled_date": "2024-06-05",
            "status": "skipped",
            "completion_details": "not json"
        }),
        &client_token(client_id),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "completion_details");
}

#[tokio::test]
async fn test_upsert_rejects_unknown_status() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "appt-3",
            "item_type": "appointment",
            "scheduled_date": "2024-06-05",
            "status": "done-ish"
        }),
        &client_token(client_id),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn test_trainer_cannot_upsert() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "appt-3",
            "item_type": "appointment",
            "scheduled_date": "2024-06-05",
            "status": "completed"
        }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lookup_returns_entry_or_null() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let token = client_token(client_id);

    let uri = "/api/me/activity-log?original_item_id=appt-9&item_type=appointment";
    let (status, body) = send(&app, get_request_with_auth(uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let request = json_request_with_auth(
        Method::PUT,
        "/api/me/activity-log",
        json!({
            "original_item_id": "appt-9",
            "item_type": "appointment",
            "scheduled_date": "2024-06-05",
            "status": "rescheduled"
        }),
        &token,
    );
    send(&app, request).await;

    let (status, body) = send(&app, get_request_with_auth(uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rescheduled");
    assert_eq!(body["source_item_table"], "appointments");
}

#[tokio::test]
async fn test_trainer_lists_client_logs_in_range() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let token = client_token(client_id);

    for (item, date) in [
        ("nut-item-1-20240603", "2024-06-03"),
        ("nut-item-1-20240610", "2024-06-10"),
        ("nut-item-1-20240617", "2024-06-17"),
    ] {
        let request = json_request_with_auth(
            Method::PUT,
            "/api/me/activity-log",
            json!({
                "original_item_id": item,
                "item_type": "nutrition",
                "scheduled_date": date,
                "status": "completed"
            }),
            &token,
        );
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let uri = format!(
        "/api/clients/{}/activity-log?start=2024-06-04&end=2024-06-17",
        client_id
    );
    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["scheduled_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates.len(), 2);
    assert!(dates.contains(&"2024-06-10"));
    assert!(dates.contains(&"2024-06-17"));

    // Another trainer sees nothing
    let other = create_trainer(&app).await;
    let (status, _) = send(&app, get_request_with_auth(&uri, &other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
