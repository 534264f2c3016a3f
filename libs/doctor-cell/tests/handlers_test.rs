// libs/doctor-cell/tests/handlers_test.rs

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use doctor_cell::router::doctor_routes;
use doctor_cell::services::WorkingHoursService;
use doctor_cell::store::InMemoryWorkingHoursStore;

fn app() -> Router {
    let service = WorkingHoursService::new(Arc::new(InMemoryWorkingHoursStore::new()));
    Router::new().nest("/doctors", doctor_routes(Arc::new(service)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn put_then_get_working_hours() {
    let app = app();
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());
    let uri = format!("/doctors/{}/workplaces/{}/working-hours", doctor_id, workplace_id);

    let (status, body) = send(
        &app,
        put_json(
            &uri,
            json!({
                "slot_duration_minutes": 30,
                "working_hours": { "monday": { "start": "09:00", "end": "17:00" } }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_hours"]["monday"]["start"], "09:00");

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot_duration_minutes"], 30);
}

#[tokio::test]
async fn rejects_inverted_window_with_400() {
    let app = app();
    let uri = format!("/doctors/{}/workplaces/{}/working-hours", Uuid::new_v4(), Uuid::new_v4());

    let (status, body) = send(
        &app,
        put_json(
            &uri,
            json!({
                "slot_duration_minutes": 30,
                "working_hours": { "monday": { "start": "17:00", "end": "09:00" } }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn slot_grid_for_unknown_workplace_is_404() {
    let app = app();
    let uri = format!(
        "/doctors/{}/workplaces/{}/slots?date=2025-06-16",
        Uuid::new_v4(),
        Uuid::new_v4()
    );

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slot_grid_lists_generated_slots() {
    let app = app();
    let (doctor_id, workplace_id) = (Uuid::new_v4(), Uuid::new_v4());
    let base = format!("/doctors/{}/workplaces/{}", doctor_id, workplace_id);

    send(
        &app,
        put_json(
            &format!("{}/working-hours", base),
            json!({
                "slot_duration_minutes": 30,
                "working_hours": { "monday": { "start": "09:00", "end": "09:50" } }
            }),
        ),
    )
    .await;

    let (status, body) = send(&app, get(&format!("{}/slots?date=2025-06-16", base))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["slots"][0]["end_time"], "09:30");
}
