//! ClassMatch — Notifications bounded context.
//!
//! Holds the event-side notification pipeline (handlers reacting to domain
//! events by writing notification records) and the HTTP-facing command and
//! query handlers for notifications themselves.

pub mod application;
pub mod domain;
