//! Integration tests for user commands and queries.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_returns_201_with_user_id(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "ada@example.com",
        "password": "s3cretpass",
        "name": "Ada",
        "major": "CS",
    });
    let (status, json) = common::post_json(app, "/api/commands/users/register", &body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["ok"], true);
    assert!(json["user_id"].as_i64().unwrap() > 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({
        "email": "ada@example.com",
        "password": "anotherpass",
        "name": "Imposter",
    });
    let (status, json) = common::post_json(app, "/api/commands/users/register", &body).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "conflict");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_with_correct_password_returns_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({
        "email": "ada@example.com",
        "password": "hunter2hunter2",
    });
    let (status, json) = common::post_json(app, "/api/commands/users/login", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["user"]["id"].as_i64().unwrap(), user_id);
    assert_eq!(json["user"]["email"], "ada@example.com");
    // The password hash must never appear in a response.
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_with_wrong_password_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({
        "email": "ada@example.com",
        "password": "wrong",
    });
    let (status, _) = common::post_json(app.clone(), "/api/commands/users/login", &body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email behaves identically.
    let body = serde_json::json!({
        "email": "nobody@example.com",
        "password": "whatever",
    });
    let (status, _) = common::post_json(app, "/api/commands/users/login", &body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_user_changes_profile_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({ "name": "Ada L.", "major": "Mathematics" });
    let (status, _) =
        common::put_json(app.clone(), &format!("/api/commands/users/{user_id}"), &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) =
        common::get_json(app, &format!("/api/queries/users/detail/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Ada L.");
    assert_eq!(json["major"], "Mathematics");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_user_with_no_fields_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let body = serde_json::json!({});
    let (status, _) =
        common::put_json(app, &format!("/api/commands/users/{user_id}"), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_user_removes_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;

    let (status, _) =
        common::delete_json(app.clone(), &format!("/api/commands/users/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        common::get_json(app.clone(), &format!("/api/queries/users/detail/{user_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::delete_json(app, &format!("/api/commands/users/{user_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_user_overview_includes_availability_and_courses(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = common::seed_user(&app, "ada@example.com", "Ada").await;
    let course_id = common::seed_course(&app, "CS101").await;

    let body = serde_json::json!({ "slot": "Tue 14:00-16:00" });
    let (status, _) = common::post_json(
        app.clone(),
        &format!("/api/commands/availability/{user_id}"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = serde_json::json!({ "user_id": user_id });
    let (status, _) = common::post_json(
        app.clone(),
        &format!("/api/commands/courses/{course_id}/enroll"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) =
        common::get_json(app, &format!("/api/queries/users/{user_id}/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"].as_i64().unwrap(), user_id);
    assert_eq!(json["availability"][0]["slot"], "Tue 14:00-16:00");
    assert_eq!(json["courses"][0]["id"], "CS101");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_matches_ranks_users_by_shared_courses(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ada = common::seed_user(&app, "ada@example.com", "Ada").await;
    let grace = common::seed_user(&app, "grace@example.com", "Grace").await;
    let alan = common::seed_user(&app, "alan@example.com", "Alan").await;
    common::seed_course(&app, "CS101").await;
    common::seed_course(&app, "CS202").await;

    // Ada shares two courses with Grace and one with Alan.
    for (user_id, course_id) in [
        (ada, "CS101"),
        (ada, "CS202"),
        (grace, "CS101"),
        (grace, "CS202"),
        (alan, "CS101"),
    ] {
        let body = serde_json::json!({ "user_id": user_id });
        let (status, _) = common::post_json(
            app.clone(),
            &format!("/api/commands/courses/{course_id}/enroll"),
            &body,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = common::get_json(app, &format!("/api/queries/users/{ada}/matches")).await;

    assert_eq!(status, StatusCode::OK);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["id"].as_i64().unwrap(), grace);
    assert_eq!(matches[0]["shared_courses"].as_i64().unwrap(), 2);
    assert_eq!(matches[0]["shared_course_codes"], "CS101, CS202");
    assert_eq!(matches[1]["id"].as_i64().unwrap(), alan);
    assert_eq!(matches[1]["shared_courses"].as_i64().unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_search_users_filters_by_name_and_major(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ada = common::seed_user(&app, "ada@example.com", "Ada Lovelace").await;
    common::seed_user(&app, "grace@example.com", "Grace Hopper").await;

    let body = serde_json::json!({ "major": "Mathematics" });
    common::put_json(app.clone(), &format!("/api/commands/users/{ada}"), &body).await;

    let (status, json) =
        common::get_json(app.clone(), "/api/queries/users/search?q=lovelace").await;
    assert_eq!(status, StatusCode::OK);
    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"].as_i64().unwrap(), ada);

    let (status, json) = common::get_json(app, "/api/queries/users/search?major=Mathematics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}
