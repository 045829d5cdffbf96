//! Integration tests for measurements, goals and plan assignments.
//!
//! Tests cover:
//! - GET/POST /api/clients/:id/measurements, DELETE /api/measurements/:id
//! - GET /api/clients/:id/measurements/series
//! - GET/POST /api/clients/:id/goals, PATCH/DELETE /api/goals/:id
//! - POST /api/fitness-plans, POST /api/nutrition-plans and their reads
//! - GET /api/me/measurements, GET /api/me/goals

mod common;

use axum::http::{Method, StatusCode};
use common::{
    client_token, create_client, create_test_app, create_trainer, delete_request_with_auth,
    get_request_with_auth, global_exercise_id, json_request_with_auth, send,
};
use serde_json::json;

// =============================================================================
// Measurements
// =============================================================================

#[tokio::test]
async fn test_measurements_ordered_by_date_and_charted() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let uri = format!("/api/clients/{}/measurements", client_id);

    for (date, weight) in [
        ("2024-03-15", Some(80.5)),
        ("2024-03-01", Some(82.0)),
        ("2024-03-08", None),
    ] {
        let request = json_request_with_auth(
            Method::POST,
            &uri,
            json!({ "measurement_date": date, "weight_kg": weight, "waist_cm": 90.0 }),
            &trainer.token,
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, list) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["measurement_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2024-03-01", "2024-03-08", "2024-03-15"]);

    let series_uri = format!("{}/series?metric=weight_kg", uri);
    let (status, series) = send(&app, get_request_with_auth(&series_uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        series,
        json!([
            { "date": "2024-03-01", "value": 82.0 },
            { "date": "2024-03-15", "value": 80.5 }
        ])
    );

    // The client sees the same list
    let (status, mine) = send(
        &app,
        get_request_with_auth("/api/me/measurements", &client_token(client_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine, list);
}

#[tokio::test]
async fn test_series_rejects_unknown_metric() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let uri = format!("/api/clients/{}/measurements/series?metric=shoe_size", client_id);
    let (status, body) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "query");
}

#[tokio::test]
async fn test_delete_measurement_checks_owner() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/clients/{}/measurements", client_id),
        json!({ "measurement_date": "2024-03-01", "weight_kg": 70.0 }),
        &trainer.token,
    );
    let (_, created) = send(&app, request).await;
    let uri = format!("/api/measurements/{}", created["id"]);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Goals
// =============================================================================

#[tokio::test]
async fn test_goal_progress_and_ordering() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let uri = format!("/api/clients/{}/goals", client_id);

    let goals = [
        json!({ "goal_description": "Someday", "target_value": 10.0, "current_value": 2.0 }),
        json!({ "goal_description": "Late", "target_value": 100.0, "current_value": 150.0, "target_date": "2024-12-31" }),
        json!({ "goal_description": "Soon", "target_value": 20.0, "current_value": 5.0, "target_date": "2024-06-30" }),
    ];
    for goal in goals {
        let request = json_request_with_auth(Method::POST, &uri, goal, &trainer.token);
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, list) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    let names: Vec<&str> = list
        .iter()
        .map(|g| g["goal_description"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Soon", "Late", "Someday"]);
    assert_eq!(list[0]["progress_percent"], 25.0);
    assert_eq!(list[1]["progress_percent"], 100.0);
    assert_eq!(list[2]["progress_percent"], 20.0);
    assert_eq!(list[0]["status"], "active");
}

#[tokio::test]
async fn test_update_goal_recomputes_progress() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/clients/{}/goals", client_id),
        json!({ "goal_description": "Deadlift 150", "target_value": 150.0, "unit": "kg" }),
        &trainer.token,
    );
    let (_, created) = send(&app, request).await;
    assert_eq!(created["progress_percent"], 0.0);

    let uri = format!("/api/goals/{}", created["id"]);
    let request = json_request_with_auth(
        Method::PATCH,
        &uri,
        json!({ "current_value": 150.0, "status": "achieved" }),
        &trainer.token,
    );
    let (status, updated) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["progress_percent"], 100.0);
    assert_eq!(updated["status"], "achieved");

    let (status, mine) = send(
        &app,
        get_request_with_auth("/api/me/goals", &client_token(client_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["id"], created["id"]);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Plan assignments
// =============================================================================

#[tokio::test]
async fn test_assign_fitness_plan_copies_template_items() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;
    let pullup = global_exercise_id(&app, &trainer, "Pull-up").await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/plan-templates",
        json!({
            "name": "Upper Body",
            "items": [
                { "exercise_template_id": pullup, "day_of_week": "Tuesday" },
                { "day_of_week": "Friday", "custom_params": { "sets": 2 } }
            ]
        }),
        &trainer.token,
    );
    let (status, template) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = json_request_with_auth(
        Method::POST,
        "/api/fitness-plans",
        json!({
            "client_id": client_id,
            "source_plan_template_id": template["id"],
            "name": "Upper Body (Ana)",
            "start_date": "2024-06-01"
        }),
        &trainer.token,
    );
    let (status, plan) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", plan);
    assert_eq!(plan["source_plan_template_id"], template["id"]);

    let items = plan["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let tuesday = items.iter().find(|i| i["day_of_week"] == "Tuesday").unwrap();
    assert_eq!(tuesday["exercise_name"], "Pull-up");
    // Template items always carry an object, so it wins over the library defaults
    assert_eq!(tuesday["custom_params"], json!({}));
    let friday = items.iter().find(|i| i["day_of_week"] == "Friday").unwrap();
    assert_eq!(friday["exercise_name"], "Unnamed Exercise");
    assert_eq!(friday["custom_params"]["sets"], 2);

    let list_uri = format!("/api/clients/{}/fitness-plans", client_id);
    let (status, plans) = send(&app, get_request_with_auth(&list_uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 1);

    let uri = format!("/api/fitness-plans/{}", plan["id"]);
    let (status, fetched) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["items"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_fitness_plan_rejects_inverted_window() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/fitness-plans",
        json!({
            "client_id": client_id,
            "name": "Backwards",
            "start_date": "2024-06-10",
            "end_date": "2024-06-01",
            "items": []
        }),
        &trainer.token,
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "end_date");
}

#[tokio::test]
async fn test_assign_to_foreign_client_not_found() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let other = create_trainer(&app).await;
    let foreign_client = create_client(&app, &other).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/nutrition-plans",
        json!({
            "client_id": foreign_client,
            "name": "Cut",
            "start_date": "2024-06-01",
            "items": [ { "day_of_week": "Monday", "meal_type": "Lunch" } ]
        }),
        &trainer.token,
    );
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nutrition_plan_lifecycle() {
    let app = create_test_app().await;
    let trainer = create_trainer(&app).await;
    let client_id = create_client(&app, &trainer).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/nutrition-plans",
        json!({
            "client_id": client_id,
            "name": "Maintenance",
            "start_date": "2024-06-01",
            "items": [
                { "day_of_week": "Monday", "meal_type": "Breakfast", "calories": 500, "protein_g": 30.0 },
                { "day_of_week": "Monday", "meal_type": "Dinner", "calories": 700 }
            ]
        }),
        &trainer.token,
    );
    let (status, plan) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", plan);
    let items = plan["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item_order"], 1);
    assert_eq!(items[1]["item_order"], 2);

    let list_uri = format!("/api/clients/{}/nutrition-plans", client_id);
    let (status, plans) = send(&app, get_request_with_auth(&list_uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 1);

    let uri = format!("/api/nutrition-plans/{}", plan["id"]);
    let (status, _) = send(&app, delete_request_with_auth(&uri, &trainer.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
