//! Event-side notification handlers.
//!
//! Each handler reacts to one domain event kind by writing zero or more
//! notification records through the storage collaborator. Handlers run
//! inside the publishing call stack, after the triggering mutation has
//! committed; a storage failure here propagates to the publisher without
//! rolling back that mutation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use classmatch_core::bus::{EventBus, EventHandler};
use classmatch_core::clock::Clock;
use classmatch_core::error::DomainError;
use classmatch_core::event::{EventKind, GroupEvent};
use classmatch_core::notification::{NewNotification, NotificationRepository};

/// Notifies a group's owner that their group was created.
pub struct GroupCreatedNotifier {
    store: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl GroupCreatedNotifier {
    /// Creates the notifier.
    #[must_use]
    pub fn new(store: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl EventHandler for GroupCreatedNotifier {
    async fn handle(&self, event: &GroupEvent) -> Result<(), DomainError> {
        let GroupEvent::GroupCreated(evt) = event else {
            return Ok(());
        };
        self.store
            .insert_notification(NewNotification {
                user_id: evt.owner_user_id,
                notification_type: event.event_type().to_owned(),
                data: json!({
                    "group_id": evt.group_id,
                    "message": "Your group was created.",
                }),
                created_at: self.clock.now(),
            })
            .await?;
        debug!(
            group_id = evt.group_id,
            owner_user_id = evt.owner_user_id,
            "group_created notification written"
        );
        Ok(())
    }
}

/// Notifies a group's owner that a new member joined. The joining user is
/// not notified.
pub struct GroupJoinedNotifier {
    store: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl GroupJoinedNotifier {
    /// Creates the notifier.
    #[must_use]
    pub fn new(store: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl EventHandler for GroupJoinedNotifier {
    async fn handle(&self, event: &GroupEvent) -> Result<(), DomainError> {
        let GroupEvent::GroupJoined(evt) = event else {
            return Ok(());
        };
        self.store
            .insert_notification(NewNotification {
                user_id: evt.owner_user_id,
                notification_type: event.event_type().to_owned(),
                data: json!({
                    "group_id": evt.group_id,
                    "user_id": evt.user_id,
                    "message": "A new member joined your group.",
                }),
                created_at: self.clock.now(),
            })
            .await?;
        debug!(
            group_id = evt.group_id,
            user_id = evt.user_id,
            owner_user_id = evt.owner_user_id,
            "group_joined notification written"
        );
        Ok(())
    }
}

/// Notifies every active member of a group, except the poster, that a
/// message was posted. A group with no other active members yields zero
/// notifications.
pub struct GroupMessagePostedNotifier {
    store: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl GroupMessagePostedNotifier {
    /// Creates the notifier.
    #[must_use]
    pub fn new(store: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl EventHandler for GroupMessagePostedNotifier {
    async fn handle(&self, event: &GroupEvent) -> Result<(), DomainError> {
        let GroupEvent::GroupMessagePosted(evt) = event else {
            return Ok(());
        };
        let recipients = self
            .store
            .active_member_ids(evt.group_id, evt.user_id)
            .await?;
        for recipient in &recipients {
            self.store
                .insert_notification(NewNotification {
                    user_id: *recipient,
                    notification_type: event.event_type().to_owned(),
                    data: json!({
                        "group_id": evt.group_id,
                        "message_id": evt.message_id,
                        "message": "New message in your study group.",
                    }),
                    created_at: self.clock.now(),
                })
                .await?;
        }
        debug!(
            group_id = evt.group_id,
            message_id = evt.message_id,
            recipients = recipients.len(),
            "group_message_posted notifications written"
        );
        Ok(())
    }
}

/// Subscribes the three notifiers on `bus`. Must run during startup, before
/// the bus starts receiving publishes; events published earlier are dropped.
pub fn register_handlers(
    bus: &mut EventBus,
    store: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
) {
    bus.subscribe(
        EventKind::GroupCreated,
        Arc::new(GroupCreatedNotifier::new(store.clone(), clock.clone())),
    );
    bus.subscribe(
        EventKind::GroupJoined,
        Arc::new(GroupJoinedNotifier::new(store.clone(), clock.clone())),
    );
    bus.subscribe(
        EventKind::GroupMessagePosted,
        Arc::new(GroupMessagePostedNotifier::new(store, clock)),
    );
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use classmatch_core::event::{GroupCreated, GroupJoined, GroupMessagePosted};
    use classmatch_test_support::{
        FailingNotificationRepository, FixedClock, RecordingNotificationRepository,
    };

    use super::*;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_group_created_notifies_owner() {
        // Arrange
        let store = Arc::new(RecordingNotificationRepository::new());
        let notifier = GroupCreatedNotifier::new(store.clone(), fixed_clock());
        let event = GroupEvent::GroupCreated(GroupCreated {
            group_id: 10,
            owner_user_id: 42,
        });

        // Act
        notifier.handle(&event).await.unwrap();

        // Assert
        let inserted = store.inserted_notifications();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].user_id, 42);
        assert_eq!(inserted[0].notification_type, "group_created");
        assert_eq!(inserted[0].data["group_id"], 10);
        assert_eq!(inserted[0].data["message"], "Your group was created.");
        assert_eq!(
            inserted[0].created_at,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_group_joined_notifies_owner_not_joining_user() {
        // Arrange
        let store = Arc::new(RecordingNotificationRepository::new());
        let notifier = GroupJoinedNotifier::new(store.clone(), fixed_clock());
        let event = GroupEvent::GroupJoined(GroupJoined {
            group_id: 11,
            user_id: 5,
            owner_user_id: 99,
        });

        // Act
        notifier.handle(&event).await.unwrap();

        // Assert
        let inserted = store.inserted_notifications();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].user_id, 99);
        assert_eq!(inserted[0].notification_type, "group_joined");
        assert_eq!(inserted[0].data["group_id"], 11);
        assert_eq!(inserted[0].data["user_id"], 5);
    }

    #[tokio::test]
    async fn test_group_message_posted_notifies_each_active_member() {
        // Arrange: the store's member query already excludes the poster and
        // pending members.
        let store = Arc::new(RecordingNotificationRepository::with_active_members(vec![2]));
        let notifier = GroupMessagePostedNotifier::new(store.clone(), fixed_clock());
        let event = GroupEvent::GroupMessagePosted(GroupMessagePosted {
            group_id: 20,
            user_id: 1,
            message_id: 100,
        });

        // Act
        notifier.handle(&event).await.unwrap();

        // Assert: the member query was scoped to the group, excluding the
        // poster, and exactly one notification was written.
        assert_eq!(store.member_queries(), vec![(20, 1)]);
        let inserted = store.inserted_notifications();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].user_id, 2);
        assert_eq!(inserted[0].notification_type, "group_message_posted");
        assert_eq!(inserted[0].data["group_id"], 20);
        assert_eq!(inserted[0].data["message_id"], 100);
    }

    #[tokio::test]
    async fn test_group_message_posted_with_no_other_members_writes_nothing() {
        // Arrange
        let store = Arc::new(RecordingNotificationRepository::new());
        let notifier = GroupMessagePostedNotifier::new(store.clone(), fixed_clock());
        let event = GroupEvent::GroupMessagePosted(GroupMessagePosted {
            group_id: 20,
            user_id: 1,
            message_id: 100,
        });

        // Act
        let result = notifier.handle(&event).await;

        // Assert: zero recipients is success, not an error.
        assert!(result.is_ok());
        assert!(store.inserted_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        // Arrange
        let store = Arc::new(FailingNotificationRepository);
        let notifier = GroupCreatedNotifier::new(store, fixed_clock());
        let event = GroupEvent::GroupCreated(GroupCreated {
            group_id: 1,
            owner_user_id: 2,
        });

        // Act
        let result = notifier.handle(&event).await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            DomainError::Infrastructure(_)
        ));
    }

    #[tokio::test]
    async fn test_notifier_ignores_other_event_kinds() {
        // Arrange
        let store = Arc::new(RecordingNotificationRepository::new());
        let notifier = GroupCreatedNotifier::new(store.clone(), fixed_clock());
        let event = GroupEvent::GroupJoined(GroupJoined {
            group_id: 1,
            user_id: 2,
            owner_user_id: 3,
        });

        // Act
        notifier.handle(&event).await.unwrap();

        // Assert
        assert!(store.inserted_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_register_handlers_routes_each_kind_to_its_notifier() {
        // Arrange
        let store = Arc::new(RecordingNotificationRepository::with_active_members(vec![7]));
        let mut bus = EventBus::new();
        register_handlers(&mut bus, store.clone(), fixed_clock());

        // Act
        bus.publish(&GroupEvent::GroupCreated(GroupCreated {
            group_id: 1,
            owner_user_id: 2,
        }))
        .await
        .unwrap();
        bus.publish(&GroupEvent::GroupJoined(GroupJoined {
            group_id: 1,
            user_id: 3,
            owner_user_id: 2,
        }))
        .await
        .unwrap();
        bus.publish(&GroupEvent::GroupMessagePosted(GroupMessagePosted {
            group_id: 1,
            user_id: 3,
            message_id: 9,
        }))
        .await
        .unwrap();

        // Assert: one notification per publish, typed per event kind.
        let inserted = store.inserted_notifications();
        assert_eq!(inserted.len(), 3);
        assert_eq!(inserted[0].notification_type, "group_created");
        assert_eq!(inserted[1].notification_type, "group_joined");
        assert_eq!(inserted[2].notification_type, "group_message_posted");
        assert_eq!(inserted[2].user_id, 7);
    }
}
