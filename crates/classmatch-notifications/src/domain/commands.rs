//! Commands for the Notifications context.

use classmatch_core::command::Command;
use uuid::Uuid;

/// Command to create a notification directly (outside the event pipeline).
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The recipient user.
    pub user_id: i64,
    /// Type tag for the notification.
    pub notification_type: String,
    /// Optional display payload.
    pub data: Option<serde_json::Value>,
}

impl Command for CreateNotification {
    fn command_type(&self) -> &'static str {
        "notifications.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to mark one of a user's notifications as read.
#[derive(Debug, Clone)]
pub struct MarkNotificationRead {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
    /// The notification to mark.
    pub notification_id: i64,
}

impl Command for MarkNotificationRead {
    fn command_type(&self) -> &'static str {
        "notifications.mark_read"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to mark all of a user's unread notifications as read.
#[derive(Debug, Clone)]
pub struct MarkAllNotificationsRead {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
}

impl Command for MarkAllNotificationsRead {
    fn command_type(&self) -> &'static str {
        "notifications.mark_all_read"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete one of a user's notifications.
#[derive(Debug, Clone)]
pub struct DeleteNotification {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
    /// The notification to delete.
    pub notification_id: i64,
}

impl Command for DeleteNotification {
    fn command_type(&self) -> &'static str {
        "notifications.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
