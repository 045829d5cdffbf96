//! Integration tests for the unified client calendar.
//!
//! Tests cover:
//! - GET /api/clients/:id/calendar (trainer view)
//! - GET /api/me/calendar (client view)
//! - Range validation and ownership

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    client_token, create_client, create_test_app, create_test_app_with, create_trainer,
    get_request_with_auth, global_exercise_id, json_request_with_auth, send, test_config,
    TestTrainer,
};
use serde_json::{json, Value};

/// Seeds one week of activity for the client: two fitness items (Monday
/// and Thursday), one nutrition item (Wednesday) and one appointment on
/// Wednesday morning. 2024-06-03 is a Monday.
async fn seed_week(app: &Router, trainer: &TestTrainer, client_id: i64) {
    let squat = global_exercise_id(app, trainer, "Back Squat").await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/fitness-plans",
        json!({
            "client_id": client_id,
            "name": "Strength Block",
            "start_date": "2024-06-01",
            "items": [
                { "exercise_template_id": squat, "day_of_week": "Monday" },
                { "exercise_name": "Jump Rope", "day_of_week": "Thursday", "custom_params": { "reps": 100 } },
                { "exercise_name": "Stretching" }
            ]
        }),
        &trainer.token,
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let request = json_request_with_auth(
        Method::POST,
        "/api/nutrition-plans",
        json!({
            "client_id": client_id,
            "name": "Lean Bulk",
            "start_date": "2024-06-01",
            "end_date": "2024-06-30",
            "items": [
                { "day_of_week": "Wednesday", "meal_type": "Breakfast", "calories": 450 }
            ]
        }),
        &trainer.token,
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

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
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
}

fn ids(events: &Value) -> Vec<String> {
    events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_trainer_calendar_merges_streams_in_order() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    seed_week(&app, &trainer, client_id).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-09",
        client_id
    );
    let (status, events) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::OK);
    let events_arr = events.as_array().unwrap();
    assert_eq!(events_arr.len(), 4);

    let types: Vec<&str> = events_arr
        .iter()
        .map(|e| e["item_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["fitness", "nutrition", "appointment", "fitness"]);

    let monday = &events_arr[0];
    assert_eq!(monday["title"], "Back Squat");
    assert_eq!(monday["allDay"], true);
    assert_eq!(monday["scheduled_date"], "2024-06-03");
    assert_eq!(monday["extendedProps"]["plan_name"], "Strength Block");
    assert_eq!(monday["extendedProps"]["sets"], 4);
    assert_eq!(monday["extendedProps"]["reps"], 8);
    assert!(monday["id"].as_str().unwrap().ends_with("-20240603"));
    assert!(monday["id"].as_str().unwrap().starts_with("fit-item-"));

    let meal = &events_arr[1];
    assert_eq!(meal["title"], "Breakfast");
    assert_eq!(meal["extendedProps"]["calories"], 450);

    let appt = &events_arr[2];
    assert!(appt["id"].as_str().unwrap().starts_with("appt-"));
    assert_eq!(appt["allDay"], false);
    assert_eq!(appt["scheduled_date"], "2024-06-05");
    assert_eq!(appt["extendedProps"]["status"], "Scheduled");

    let thursday = &events_arr[3];
    assert_eq!(thursday["title"], "Jump Rope");
    assert_eq!(thursday["extendedProps"]["reps"], 100);
}

#[tokio::test]
async fn test_calendar_ids_are_stable_across_requests() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    seed_week(&app, &trainer, client_id).await;

    let full_week = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-09",
        client_id
    );
    let monday_only = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-03",
        client_id
    );

    let (_, week) = send(&app, get_request_with_auth(&full_week, &trainer.token)).await;
    let (_, again) = send(&app, get_request_with_auth(&full_week, &trainer.token)).await;
    let (_, monday) = send(&app, get_request_with_auth(&monday_only, &trainer.token)).await;

    assert_eq!(ids(&week), ids(&again));
    assert_eq!(ids(&monday).len(), 1);
    assert_eq!(ids(&monday)[0], ids(&week)[0]);
}

#[tokio::test]
async fn test_client_reads_own_calendar() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    seed_week(&app, &trainer, client_id).await;

    let (status, events) = send(
        &app,
        get_request_with_auth(
            "/api/me/calendar?start=2024-06-03&end=2024-06-09",
            &client_token(client_id),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_client_cannot_read_another_clients_calendar() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let other_client = create_client(&app, &trainer).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-09",
        other_client
    );
    let (status, _) = send(&app, get_request_with_auth(&uri, &client_token(client_id))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_of_foreign_client_not_found() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;
    let foreign_client = create_client(&app, &other).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-09",
        foreign_client
    );
    let (status, _) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_calendar() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-09",
        client_id
    );
    let (status, events) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn test_calendar_rejects_inverted_range() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-09&end=2024-06-03",
        client_id
    );
    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "end");
}

#[tokio::test]
async fn test_calendar_rejects_range_over_limit() {
    let mut config = test_config();
    config.calendar.max_range_days = 7;
    let app = create_test_app_with(config).await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-10",
        client_id
    );
    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Date range must not exceed 7 days");
}

#[tokio::test]
async fn test_calendar_rejects_unparsable_dates() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let uri = format!("/api/clients/{}/calendar?start=june&end=2024-06-10", client_id);
    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "query");
}

#[tokio::test]
async fn test_calendar_includes_appointment_started_before_range() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        json!({
            "client_id": client_id,
            "title": "Overnight retreat",
            "start_time": "2024-06-02T20:00:00Z",
            "end_time": "2024-06-04T10:00:00Z"
        }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-03&end=2024-06-03",
        client_id
    );
    let (status, events) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Overnight retreat");
    assert_eq!(events[0]["scheduled_date"], "2024-06-03");

    // Ended before the range started
    let uri = format!(
        "/api/clients/{}/calendar?start=2024-06-05&end=2024-06-05",
        client_id
    );
    let (_, events) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(events, json!([]));
}
