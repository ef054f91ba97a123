//! Integration tests for availability commands and queries.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_add_and_list_slots(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "slot": "Tue 14:00-16:00" });
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["slot_id"].as_i64().unwrap() > 0);

    let (status, json) =
        common::get_json(app, &format!("/api/queries/availability/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let slots = json.as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["slot"], "Tue 14:00-16:00");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_add_slot_for_unknown_user_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "slot": "Tue 14:00-16:00" });
    let (status, _) =
        common::post_json(app, "/api/commands/availability/999999", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_replace_slots_swaps_list_and_skips_empty_strings(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "slot": "Mon 9:00-10:00" });
    common::post_json(
        app.clone(),
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;

    let body = serde_json::json!({ "slots": ["Wed 13:00-15:00", "", "Fri 10:00-12:00"] });
    let (status, _) = common::put_json(
        app.clone(),
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/queries/availability/{user_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let slots: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slot"].as_str().unwrap())
        .collect();
    assert_eq!(slots, vec!["Wed 13:00-15:00", "Fri 10:00-12:00"]);

    // A missing slots array is a validation error.
    let body = serde_json::json!({});
    let (status, _) = common::put_json(
        app,
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_slot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "slot": "Tue 14:00-16:00" });
    let (_, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;
    let slot_id = json["slot_id"].as_i64().unwrap();

    let uri = format!("/api/commands/availability/{user_id}/{slot_id}");
    let (status, _) = common::delete_json(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::delete_json(app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
