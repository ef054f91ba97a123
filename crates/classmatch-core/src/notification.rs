//! Notification records and the storage contract the pipeline writes through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// A notification row to be inserted for a recipient. The pipeline only ever
/// creates notifications; reading and mutating them is the notifications
/// context's query/command side.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: i64,
    /// Type tag (stored in the `type` column), e.g. `group_created`.
    pub notification_type: String,
    /// Opaque payload describing the event for display.
    pub data: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Storage operations the notification pipeline needs. Each write commits
/// independently of the mutation that triggered the event.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Inserts a notification record and returns its generated id.
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<i64, DomainError>;

    /// Returns the user ids of `group_id`'s active members, excluding
    /// `excluding_user_id`. Pending members are not included.
    async fn active_member_ids(
        &self,
        group_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<i64>, DomainError>;
}
