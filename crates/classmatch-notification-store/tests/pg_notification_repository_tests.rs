//! Integration tests for `PgNotificationRepository`.

use chrono::{TimeZone, Utc};
use classmatch_core::notification::{NewNotification, NotificationRepository};
use classmatch_notification_store::pg_notification_repository::PgNotificationRepository;
use sqlx::{PgPool, Row};

async fn seed_user(pool: &PgPool, email: &str, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, password_hash, name) VALUES ($1, 'x', $2) RETURNING id",
    )
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_group(pool: &PgPool, owner_user_id: i64) -> i64 {
    sqlx::query(
        "INSERT INTO courses (id, code, name, section, instructor, schedule, students) \
         VALUES ('CS101', 'CS101', 'Intro', 'A', 'Prof', 'MWF 9am', 0) \
         ON CONFLICT (id) DO NOTHING",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query_scalar::<_, i64>(
        "INSERT INTO study_groups (owner_user_id, course_id, name) \
         VALUES ($1, 'CS101', 'Study Group') RETURNING id",
    )
    .bind(owner_user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_member(pool: &PgPool, group_id: i64, user_id: i64, status: &str) {
    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, role, status) \
         VALUES ($1, $2, 'member', $3)",
    )
    .bind(group_id)
    .bind(user_id)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_notification_persists_row_and_returns_id(pool: PgPool) {
    let repo = PgNotificationRepository::new(pool.clone());
    let user_id = seed_user(&pool, "owner@example.com", "Owner").await;
    let created_at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

    let id = repo
        .insert_notification(NewNotification {
            user_id,
            notification_type: "group_created".to_owned(),
            data: serde_json::json!({"group_id": 10, "message": "Your group was created."}),
            created_at,
        })
        .await
        .unwrap();

    let row = sqlx::query(
        "SELECT user_id, type, data, is_read, created_at FROM notifications WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(row.get::<i64, _>("user_id"), user_id);
    assert_eq!(row.get::<String, _>("type"), "group_created");
    assert_eq!(
        row.get::<serde_json::Value, _>("data")["message"],
        "Your group was created."
    );
    // New notifications default to unread.
    assert!(!row.get::<bool, _>("is_read"));
    assert_eq!(
        row.get::<chrono::DateTime<Utc>, _>("created_at"),
        created_at
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_active_member_ids_excludes_poster_and_pending_members(pool: PgPool) {
    let repo = PgNotificationRepository::new(pool.clone());
    let poster = seed_user(&pool, "u1@example.com", "U1").await;
    let active = seed_user(&pool, "u2@example.com", "U2").await;
    let pending = seed_user(&pool, "u3@example.com", "U3").await;
    let group_id = seed_group(&pool, poster).await;
    seed_member(&pool, group_id, poster, "active").await;
    seed_member(&pool, group_id, active, "active").await;
    seed_member(&pool, group_id, pending, "pending").await;

    let members = repo.active_member_ids(group_id, poster).await.unwrap();

    assert_eq!(members, vec![active]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_active_member_ids_empty_when_poster_is_only_active_member(pool: PgPool) {
    let repo = PgNotificationRepository::new(pool.clone());
    let poster = seed_user(&pool, "solo@example.com", "Solo").await;
    let group_id = seed_group(&pool, poster).await;
    seed_member(&pool, group_id, poster, "active").await;

    let members = repo.active_member_ids(group_id, poster).await.unwrap();

    assert!(members.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_active_member_ids_scoped_to_group(pool: PgPool) {
    let repo = PgNotificationRepository::new(pool.clone());
    let poster = seed_user(&pool, "a@example.com", "A").await;
    let other = seed_user(&pool, "b@example.com", "B").await;
    let group_a = seed_group(&pool, poster).await;
    let group_b = seed_group(&pool, other).await;
    seed_member(&pool, group_a, poster, "active").await;
    seed_member(&pool, group_b, other, "active").await;

    let members = repo.active_member_ids(group_a, poster).await.unwrap();

    assert!(members.is_empty());
}
