//! In-process event bus.
//!
//! The bus decouples command handlers from notification side effects within
//! a single process and a single logical call. Dispatch is fully
//! synchronous: `publish` awaits every registered handler, in registration
//! order, before returning to the caller. There is no queue, no background
//! worker, and no replay of events published before a handler subscribed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::{EventKind, GroupEvent};

/// A subscriber reacting to one event kind, typically by writing storage
/// records. Handlers trust the event's referenced ids were valid at emission
/// time and perform no domain-level validation.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Reacts to `event`. A storage failure propagates to the publisher.
    async fn handle(&self, event: &GroupEvent) -> Result<(), DomainError>;
}

/// Registry mapping an event kind to an ordered list of subscribers.
///
/// Built once during startup registration and shared read-only afterwards
/// (`subscribe` takes `&mut self`, so a bus behind an `Arc` cannot gain new
/// subscribers).
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` to be invoked for every future publish of `kind`.
    /// Multiple handlers may subscribe to the same kind; they run in
    /// registration order.
    pub fn subscribe(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Dispatches `event` to every handler registered for its kind, in
    /// registration order, within the caller's call stack. A kind with no
    /// subscribers is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns the first handler error. Handlers registered after the
    /// failing one do not run for this publish; writes already performed by
    /// earlier handlers stand. There is no transactional coupling between
    /// handlers, or between a handler and the mutation that produced the
    /// event.
    pub async fn publish(&self, event: &GroupEvent) -> Result<(), DomainError> {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return Ok(());
        };
        for handler in handlers {
            handler.handle(event).await?;
        }
        Ok(())
    }
}
