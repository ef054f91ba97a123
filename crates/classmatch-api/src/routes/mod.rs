//! Route modules, split into the CQRS command and query sides.

use serde::Serialize;

pub mod commands;
pub mod health;
pub mod queries;

/// Standard acknowledgement body for commands without a payload to return.
#[derive(Debug, Serialize)]
pub struct OkMessage {
    /// Always true on success.
    pub ok: bool,
    /// Human-readable confirmation.
    pub message: &'static str,
}

impl OkMessage {
    pub(crate) fn new(message: &'static str) -> Self {
        Self { ok: true, message }
    }
}
