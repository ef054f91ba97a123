//! Integration tests for notification commands and queries.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_notification_directly(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({
        "type": "system_announcement",
        "data": { "message": "Welcome to ClassMatch!" },
    });
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["notification_id"].as_i64().unwrap() > 0);

    let notifications = common::notifications_for(&app, user_id).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "system_announcement");
    assert_eq!(notifications[0]["is_read"], false);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_notification_requires_type_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "data": {} });
    let (status, _) = common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "type": "system_announcement" });
    let (status, _) =
        common::post_json(app, "/api/commands/notifications/999999", &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unread_count_and_mark_read(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "type": "system_announcement" });
    let (_, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}"),
        &body,
    )
    .await;
    let first_id = json["notification_id"].as_i64().unwrap();
    common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}"),
        &body,
    )
    .await;

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/queries/notifications/{user_id}/count"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["unread_count"].as_i64().unwrap(), 2);

    let (status, _) = common::patch_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}/{first_id}/read"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/queries/notifications/{user_id}/count"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["unread_count"].as_i64().unwrap(), 1);

    // The unread filter excludes the read notification.
    let (status, json) = common::get_json(
        app,
        &format!("/api/queries/notifications/{user_id}?unread_only=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let unread = json.as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert!(unread[0]["id"].as_i64().unwrap() != first_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_all_read_reports_updated_count(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "type": "system_announcement" });
    for _ in 0..3 {
        common::post_json(
            app.clone(),
            &format!("/api/commands/notifications/{user_id}"),
            &body,
        )
        .await;
    }

    let (status, json) = common::patch_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}/read-all"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated_count"].as_i64().unwrap(), 3);

    // Marking again finds nothing unread.
    let (status, json) = common::patch_json(
        app,
        &format!("/api/commands/notifications/{user_id}/read-all"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated_count"].as_i64().unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_read_is_scoped_to_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ada = common::seed_user(&app, "ada@example.com", "Ada").await;
    let grace = common::seed_user(&app, "grace@example.com", "Grace").await;

    let body = serde_json::json!({ "type": "system_announcement" });
    let (_, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{ada}"),
        &body,
    )
    .await;
    let notification_id = json["notification_id"].as_i64().unwrap();

    // Another user cannot mark it.
    let (status, _) = common::patch_json(
        app.clone(),
        &format!("/api/commands/notifications/{grace}/{notification_id}/read"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_notification(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "type": "system_announcement" });
    let (_, json) = common::post_json(
        app.clone(),
        &format!("/api/commands/notifications/{user_id}"),
        &body,
    )
    .await;
    let notification_id = json["notification_id"].as_i64().unwrap();

    let uri = format!("/api/commands/notifications/{user_id}/{notification_id}");
    let (status, _) = common::delete_json(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::delete_json(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(common::notifications_for(&app, user_id).await.is_empty());
}
