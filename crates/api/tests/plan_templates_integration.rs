//! Integration tests for the exercise library and plan templates.
//!
//! Tests cover:
//! - GET/POST /api/exercise-templates, PATCH/DELETE /api/exercise-templates/:id
//! - POST/GET /api/plan-templates, GET/PUT/DELETE /api/plan-templates/:id
//! - GET /api/plan-templates/:id/builder

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_trainer, delete_request_with_auth, get_request_with_auth,
    global_exercise_id, json_request_with_auth, send,
};
use serde_json::json;

// =============================================================================
// Exercise library
// =============================================================================

#[tokio::test]
async fn test_exercise_list_puts_own_before_global() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    for name in ["Sled Push", "Kettlebell Swing"] {
        let request = json_request_with_auth(
            Method::POST,
            "/api/exercise-templates",
            json!({ "name": name, "type": "strength" }),
            &trainer.token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["trainer_id"], trainer.id);
    }

    let (status, body) = send(
        &app,
        get_request_with_auth("/api/exercise-templates", &trainer.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[0], "Kettlebell Swing");
    assert_eq!(names[1], "Sled Push");
    assert!(names[2..].contains(&"Back Squat"));
    assert_eq!(names.len(), 8);
}

#[tokio::test]
async fn test_exercise_default_params_string_is_parsed() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/exercise-templates",
        json!({ "name": "Rower", "default_params": "{\"duration_mins\": 15}" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["default_params"]["duration_mins"], 15);

    let request = json_request_with_auth(
        Method::POST,
        "/api/exercise-templates",
        json!({ "name": "Broken", "default_params": [1, 2, 3] }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "default_params");
}

#[tokio::test]
async fn test_global_exercise_is_read_only() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let squat = global_exercise_id(&app, &trainer, "Back Squat").await;
    let uri = format!("/api/exercise-templates/{}", squat);

    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["trainer_id"].is_null());

    let request = json_request_with_auth(
        Method::PATCH,
        &uri,
        json!({ "name": "Front Squat" }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_own_exercise() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/exercise-templates",
        json!({ "name": "Farmer Carry", "equipment": "dumbbells" }),
        &trainer.token,
    );
    let (_, created) = send(&app, request).await;
    let uri = format!("/api/exercise-templates/{}", created["id"]);

    let request = json_request_with_auth(
        Method::PATCH,
        &uri,
        json!({ "muscle_group": "grip" }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["muscle_group"], "grip");
    assert_eq!(body["equipment"], "dumbbells");

    // Invisible to other trainers
    let (status, _) = send(&app, get_request_with_auth(&uri, &other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Plan templates
// =============================================================================

#[tokio::test]
async fn test_create_template_from_days_and_read_builder() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let squat = global_exercise_id(&app, &trainer, "Back Squat").await;
    let plank = global_exercise_id(&app, &trainer, "Plank").await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plan-templates",
        json!({
            "name": "Beginner Strength",
            "duration_weeks": 8,
            "days_per_week": 2,
            "days": {
                "Monday": [
                    { "exercise_template_id": plank, "exercise_order": 9 },
                    { "exercise_template_id": squat, "custom_params": { "sets": 5 } }
                ],
                "Unassigned": [
                    { "notes": "Optional mobility" }
                ]
            }
        }),
        &trainer.token,
    );
    let (status, created) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);

    let items = created["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    let first = &items[0];
    assert_eq!(first["day_of_week"], "Monday");
    assert_eq!(first["exercise_order"], 1);
    assert_eq!(first["exercise"]["name"], "Plank");

    let uri = format!("/api/plan-templates/{}/builder", created["id"]);
    let (status, view) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["name"], "Beginner Strength");

    let monday = view["days"]["Monday"].as_array().unwrap();
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[0]["exercise_template_id"], plank);
    assert_eq!(monday[1]["exercise_template_id"], squat);
    assert_eq!(monday[1]["custom_params"]["sets"], 5);

    let unassigned = view["days"]["Unassigned"].as_array().unwrap();
    assert_eq!(unassigned.len(), 1);
    assert!(unassigned[0]["day_of_week"].is_null());
}

#[tokio::test]
async fn test_template_rejects_unknown_exercise() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plan-templates",
        json!({
            "name": "Ghost Plan",
            "items": [ { "exercise_template_id": 99999, "day_of_week": "Friday" } ]
        }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "exercise_template_id");

    let (_, list) = send(&app, get_request_with_auth("/api/plan-templates", &trainer.token)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_put_replaces_all_items() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let squat = global_exercise_id(&app, &trainer, "Back Squat").await;
    let deadlift = global_exercise_id(&app, &trainer, "Deadlift").await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plan-templates",
        json!({
            "name": "Lower Body",
            "items": [
                { "exercise_template_id": squat, "day_of_week": "Monday" },
                { "exercise_template_id": squat, "day_of_week": "Thursday" }
            ]
        }),
        &trainer.token,
    );
    let (_, created) = send(&app, request).await;
    let uri = format!("/api/plan-templates/{}", created["id"]);

    let request = json_request_with_auth(
        Method::PUT,
        &uri,
        json!({
            "name": "Lower Body v2",
            "items": [ { "exercise_template_id": deadlift, "day_of_week": "Tuesday" } ]
        }),
        &trainer.token,
    );
    let (status, updated) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["name"], "Lower Body v2");
    assert_eq!(updated["items"].as_array().unwrap().len(), 1);

    let (_, fetched) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    let items = fetched["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["exercise"]["name"], "Deadlift");
    assert_eq!(items[0]["day_of_week"], "Tuesday");
}

#[tokio::test]
async fn test_template_ownership_and_delete() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plan-templates",
        json!({ "name": "Private Plan" }),
        &trainer.token,
    );
    let (status, created) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/plan-templates/{}", created["id"]);

    let (status, _) = send(&app, get_request_with_auth(&uri, &other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete_request_with_auth(&uri, &other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
