//! Commands for the Groups context.

use classmatch_core::command::Command;
use uuid::Uuid;

/// Command to create a study group. The owner becomes an active admin
/// member in the same transaction.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub owner_user_id: i64,
    /// The course this group studies.
    pub course_id: String,
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: String,
    /// Free-text meeting time.
    pub meeting_time: String,
    /// Free-text location.
    pub location: String,
    /// Member cap, if any.
    pub max_members: Option<i32>,
}

impl Command for CreateGroup {
    fn command_type(&self) -> &'static str {
        "groups.create_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Partial group update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New meeting time.
    pub meeting_time: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New member cap.
    pub max_members: Option<i32>,
    /// New tags blob.
    pub tags: Option<String>,
}

impl GroupPatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.meeting_time.is_none()
            && self.location.is_none()
            && self.max_members.is_none()
            && self.tags.is_none()
    }
}

/// Command to update a group's details.
#[derive(Debug, Clone)]
pub struct UpdateGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group to update.
    pub group_id: i64,
    /// The fields to change.
    pub patch: GroupPatch,
}

impl Command for UpdateGroup {
    fn command_type(&self) -> &'static str {
        "groups.update_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a group. `hard` removes the row; otherwise the group
/// is archived.
#[derive(Debug, Clone)]
pub struct DeleteGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group to delete.
    pub group_id: i64,
    /// Hard delete instead of archiving.
    pub hard: bool,
}

impl Command for DeleteGroup {
    fn command_type(&self) -> &'static str {
        "groups.delete_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to join a group as an active member.
#[derive(Debug, Clone)]
pub struct JoinGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group to join.
    pub group_id: i64,
    /// The joining user.
    pub user_id: i64,
}

impl Command for JoinGroup {
    fn command_type(&self) -> &'static str {
        "groups.join_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to leave a group. The owner cannot leave.
#[derive(Debug, Clone)]
pub struct LeaveGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group to leave.
    pub group_id: i64,
    /// The leaving user.
    pub user_id: i64,
}

impl Command for LeaveGroup {
    fn command_type(&self) -> &'static str {
        "groups.leave_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to transfer group ownership to an active member.
#[derive(Debug, Clone)]
pub struct TransferOwnership {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: i64,
    /// The member taking over ownership.
    pub new_owner_id: i64,
}

impl Command for TransferOwnership {
    fn command_type(&self) -> &'static str {
        "groups.transfer_ownership"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to post a message in a group.
#[derive(Debug, Clone)]
pub struct PostMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group to post in.
    pub group_id: i64,
    /// The posting user.
    pub user_id: i64,
    /// Message body.
    pub content: String,
}

impl Command for PostMessage {
    fn command_type(&self) -> &'static str {
        "groups.post_message"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a message.
#[derive(Debug, Clone)]
pub struct DeleteMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The message to delete.
    pub message_id: i64,
}

impl Command for DeleteMessage {
    fn command_type(&self) -> &'static str {
        "groups.delete_message"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
