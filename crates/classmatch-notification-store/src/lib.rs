//! PostgreSQL implementation of the notification storage contract.

pub mod pg_notification_repository;
