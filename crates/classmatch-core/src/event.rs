//! Domain events emitted by the group context.
//!
//! An event is an immutable fact: the mutation that produced it has already
//! committed by the time the event value exists. Events are created once,
//! dispatched once, and not retained afterwards.

use serde::{Deserialize, Serialize};

/// Emitted when a study group is persisted with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCreated {
    /// The new group's identifier.
    pub group_id: i64,
    /// The user who owns the group.
    pub owner_user_id: i64,
}

/// Emitted when a user becomes an active member of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupJoined {
    /// The group that was joined.
    pub group_id: i64,
    /// The joining user.
    pub user_id: i64,
    /// The user who owns the group.
    pub owner_user_id: i64,
}

/// Emitted when a message is persisted in a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMessagePosted {
    /// The group the message was posted in.
    pub group_id: i64,
    /// The posting user.
    pub user_id: i64,
    /// The new message's identifier.
    pub message_id: i64,
}

/// Event type identifier for [`GroupCreated`]. Doubles as the notification
/// type tag written for it.
pub const GROUP_CREATED_EVENT_TYPE: &str = "group_created";

/// Event type identifier for [`GroupJoined`].
pub const GROUP_JOINED_EVENT_TYPE: &str = "group_joined";

/// Event type identifier for [`GroupMessagePosted`].
pub const GROUP_MESSAGE_POSTED_EVENT_TYPE: &str = "group_message_posted";

/// The variant tag identifying which event shape a value is. Used as the
/// subscription registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A group was created.
    GroupCreated,
    /// A user joined a group.
    GroupJoined,
    /// A message was posted in a group.
    GroupMessagePosted,
}

/// Domain event sum type for the group context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// A group was created.
    GroupCreated(GroupCreated),
    /// A user joined a group.
    GroupJoined(GroupJoined),
    /// A message was posted in a group.
    GroupMessagePosted(GroupMessagePosted),
}

impl GroupEvent {
    /// Returns the variant tag for registry lookup.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GroupCreated(_) => EventKind::GroupCreated,
            Self::GroupJoined(_) => EventKind::GroupJoined,
            Self::GroupMessagePosted(_) => EventKind::GroupMessagePosted,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GroupCreated(_) => GROUP_CREATED_EVENT_TYPE,
            Self::GroupJoined(_) => GROUP_JOINED_EVENT_TYPE,
            Self::GroupMessagePosted(_) => GROUP_MESSAGE_POSTED_EVENT_TYPE,
        }
    }
}
