//! Query handlers for the Notifications context.

use chrono::{DateTime, Utc};
use classmatch_core::error::DomainError;
use serde::Serialize;
use sqlx::PgPool;

/// Read-only view of a notification row.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct NotificationView {
    /// The notification id.
    pub id: i64,
    /// Type tag.
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Display payload.
    pub data: Option<serde_json::Value>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

async fn user_exists(pool: &PgPool, user_id: i64) -> Result<bool, DomainError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map(|row| row.is_some())
        .map_err(|e| DomainError::Infrastructure(format!("user lookup failed: {e}")))
}

/// Returns a user's notifications, newest first. With `unread_only`, read
/// notifications are filtered out.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the user does not exist.
pub async fn list_notifications(
    user_id: i64,
    unread_only: bool,
    pool: &PgPool,
) -> Result<Vec<NotificationView>, DomainError> {
    if !user_exists(pool, user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    let sql = if unread_only {
        "SELECT id, type AS notification_type, data, is_read, created_at \
         FROM notifications WHERE user_id = $1 AND is_read = FALSE \
         ORDER BY created_at DESC"
    } else {
        "SELECT id, type AS notification_type, data, is_read, created_at \
         FROM notifications WHERE user_id = $1 \
         ORDER BY created_at DESC"
    };

    sqlx::query_as::<_, NotificationView>(sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("notification query failed: {e}")))
}

/// Returns the number of unread notifications for a user.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the user does not exist.
pub async fn unread_count(user_id: i64, pool: &PgPool) -> Result<i64, DomainError> {
    if !user_exists(pool, user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| DomainError::Infrastructure(format!("notification count failed: {e}")))
}
