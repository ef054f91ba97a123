//! Test repositories — mock `NotificationRepository` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use classmatch_core::error::DomainError;
use classmatch_core::notification::{NewNotification, NotificationRepository};

/// A notification repository that records every insert and answers the
/// member query from a configured list. Insert ids are assigned
/// sequentially starting at 1.
#[derive(Debug, Default)]
pub struct RecordingNotificationRepository {
    active_members: Vec<i64>,
    inserted: Mutex<Vec<NewNotification>>,
    member_queries: Mutex<Vec<(i64, i64)>>,
}

impl RecordingNotificationRepository {
    /// Creates a recording repository whose member query returns no one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recording repository whose member query returns
    /// `active_members` for every group.
    #[must_use]
    pub fn with_active_members(active_members: Vec<i64>) -> Self {
        Self {
            active_members,
            ..Self::default()
        }
    }

    /// Returns a snapshot of all notifications that were inserted, in
    /// insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn inserted_notifications(&self) -> Vec<NewNotification> {
        self.inserted.lock().unwrap().clone()
    }

    /// Returns the `(group_id, excluding_user_id)` pairs passed to the
    /// member query, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn member_queries(&self) -> Vec<(i64, i64)> {
        self.member_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRepository for RecordingNotificationRepository {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<i64, DomainError> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(notification);
        Ok(i64::try_from(inserted.len()).unwrap())
    }

    async fn active_member_ids(
        &self,
        group_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<i64>, DomainError> {
        self.member_queries
            .lock()
            .unwrap()
            .push((group_id, excluding_user_id));
        Ok(self.active_members.clone())
    }
}

/// A notification repository that always returns an infrastructure error.
/// Useful for testing dispatch-failure paths.
#[derive(Debug)]
pub struct FailingNotificationRepository;

#[async_trait]
impl NotificationRepository for FailingNotificationRepository {
    async fn insert_notification(
        &self,
        _notification: NewNotification,
    ) -> Result<i64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn active_member_ids(
        &self,
        _group_id: i64,
        _excluding_user_id: i64,
    ) -> Result<Vec<i64>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
