//! ClassMatch — Groups, Membership & Messages bounded context.
//!
//! Command handlers in this context are the event producers: after their own
//! transaction commits they publish the corresponding domain event on the
//! bus, which fans out to the notification pipeline within the same call.

pub mod application;
pub mod domain;
