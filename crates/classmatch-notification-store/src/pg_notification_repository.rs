//! `PostgreSQL` implementation of the `NotificationRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use classmatch_core::error::DomainError;
use classmatch_core::notification::{NewNotification, NotificationRepository};

/// PostgreSQL-backed notification repository. Each call runs as its own
/// statement on the pool, independent of any caller transaction.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Creates a new `PgNotificationRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO notifications (user_id, type, data, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(notification.user_id)
        .bind(&notification.notification_type)
        .bind(&notification.data)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("notification insert failed: {e}")))
    }

    async fn active_member_ids(
        &self,
        group_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM group_members \
             WHERE group_id = $1 AND status = 'active' AND user_id <> $2",
        )
        .bind(group_id)
        .bind(excluding_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("group member query failed: {e}")))
    }
}
