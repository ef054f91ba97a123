//! Write-side (command) route modules.

pub mod availability;
pub mod courses;
pub mod groups;
pub mod messages;
pub mod notifications;
pub mod users;
