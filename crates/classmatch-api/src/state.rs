//! Shared application state.

use std::sync::Arc;

use classmatch_core::bus::EventBus;
use sqlx::PgPool;

/// Application state shared across all request handlers. The bus is built
/// and fully subscribed during startup; from here on it is read-only.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Domain event bus, fan-out target for write-side events.
    pub bus: Arc<EventBus>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db_pool: PgPool, bus: Arc<EventBus>) -> Self {
        Self { db_pool, bus }
    }
}
