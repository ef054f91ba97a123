//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use classmatch_api::build_router;
use classmatch_api::state::AppState;
use classmatch_core::bus::EventBus;
use classmatch_notification_store::pg_notification_repository::PgNotificationRepository;
use classmatch_notifications::application::event_handlers::register_handlers;
use classmatch_test_support::FixedClock;

/// Build the full app router with a real `PgNotificationRepository` wired
/// into the event bus and a deterministic clock. Mirrors the wiring in
/// `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let clock = Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let mut bus = EventBus::new();
    register_handlers(
        &mut bus,
        Arc::new(PgNotificationRepository::new(pool.clone())),
        clock,
    );
    build_router(AppState::new(pool, Arc::new(bus)))
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Send a PATCH request and return the response.
pub async fn patch_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, None).await
}

/// Send a PATCH request with a JSON body and return the response.
pub async fn patch_json_with_body(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(body)).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}

/// Send a DELETE request with a JSON body and return the response.
pub async fn delete_json_with_body(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

/// Register a user through the API and return the new user id.
pub async fn seed_user(app: &Router, email: &str, name: &str) -> i64 {
    let body = serde_json::json!({
        "email": email,
        "password": "hunter2hunter2",
        "name": name,
    });
    let (status, json) = post_json(app.clone(), "/api/commands/users/register", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    json["user_id"].as_i64().unwrap()
}

/// Create a course through the API and return its id.
pub async fn seed_course(app: &Router, course_id: &str) -> String {
    let body = serde_json::json!({
        "id": course_id,
        "code": course_id,
        "name": "Intro to Testing",
        "section": "A",
        "instructor": "Prof. Example",
        "schedule": "MWF 9:00-10:00",
    });
    let (status, _) = post_json(app.clone(), "/api/commands/courses/", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    course_id.to_owned()
}

/// Create a group through the API and return the new group id.
pub async fn seed_group(app: &Router, owner_user_id: i64, course_id: &str) -> i64 {
    let body = serde_json::json!({
        "owner_user_id": owner_user_id,
        "course_id": course_id,
        "name": "Study Group",
    });
    let (status, json) = post_json(app.clone(), "/api/commands/groups/", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    json["group_id"].as_i64().unwrap()
}

/// Fetch a user's notifications through the API.
pub async fn notifications_for(app: &Router, user_id: i64) -> Vec<serde_json::Value> {
    let (status, json) =
        get_json(app.clone(), &format!("/api/queries/notifications/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().unwrap().clone()
}
