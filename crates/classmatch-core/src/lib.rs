//! ClassMatch Core — shared domain abstractions.
//!
//! This crate defines the types the bounded contexts depend on: the domain
//! error taxonomy, the command trait, the domain event sum type, the
//! in-process event bus, and the notification storage contract. It contains
//! no infrastructure code.

pub mod bus;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod notification;
