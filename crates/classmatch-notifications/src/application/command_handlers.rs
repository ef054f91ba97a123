//! Command handlers for the Notifications context.
//!
//! These cover direct notification writes from the HTTP surface. Event-driven
//! notification writes live in `event_handlers`.

use classmatch_core::error::DomainError;
use sqlx::PgPool;

use crate::domain::commands::{
    CreateNotification, DeleteNotification, MarkAllNotificationsRead, MarkNotificationRead,
};

async fn user_exists(pool: &PgPool, user_id: i64) -> Result<bool, DomainError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map(|row| row.is_some())
        .map_err(|e| DomainError::Infrastructure(format!("user lookup failed: {e}")))
}

/// Handles `CreateNotification`: inserts a notification for an existing user
/// and returns its id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the user does not exist, or
/// `DomainError::Infrastructure` if the insert fails.
pub async fn handle_create_notification(
    command: &CreateNotification,
    pool: &PgPool,
) -> Result<i64, DomainError> {
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_scalar::<_, i64>(
        "INSERT INTO notifications (user_id, type, data) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(command.user_id)
    .bind(&command.notification_type)
    .bind(&command.data)
    .fetch_one(pool)
    .await
    .map_err(|e| DomainError::Infrastructure(format!("notification insert failed: {e}")))
}

/// Handles `MarkNotificationRead`: flips the unread flag on one of the
/// user's notifications.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no matching notification exists for
/// this user.
pub async fn handle_mark_notification_read(
    command: &MarkNotificationRead,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(command.notification_id)
        .bind(command.user_id)
        .execute(pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("notification update failed: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("notification"));
    }
    Ok(())
}

/// Handles `MarkAllNotificationsRead`: marks every unread notification of an
/// existing user as read and returns how many rows changed.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the user does not exist.
pub async fn handle_mark_all_notifications_read(
    command: &MarkAllNotificationsRead,
    pool: &PgPool,
) -> Result<u64, DomainError> {
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    let result =
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(command.user_id)
            .execute(pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("notification update failed: {e}")))?;

    Ok(result.rows_affected())
}

/// Handles `DeleteNotification`: deletes one of the user's notifications.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no matching notification exists for
/// this user.
pub async fn handle_delete_notification(
    command: &DeleteNotification,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(command.notification_id)
        .bind(command.user_id)
        .execute(pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("notification delete failed: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("notification"));
    }
    Ok(())
}
