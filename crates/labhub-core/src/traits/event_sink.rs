//! Abstract event sink the presence core publishes into.

use async_trait::async_trait;

use crate::events::PresenceEvent;

/// Delivery boundary between the presence core and the transport layer.
///
/// Implementations resolve the event's [`Audience`](crate::events::Audience)
/// to live connections and persisted notifications. `publish` is
/// infallible at the call site: delivery failures must be handled (logged,
/// retried, dropped) inside the sink and never fail the triggering
/// heartbeat or sweep.
#[async_trait]
pub trait EventSink: Send + Sync + std::fmt::Debug {
    /// Deliver one event to its audience.
    async fn publish(&self, event: PresenceEvent);
}

/// Sink that drops all events. Used when no transport is wired up.
#[derive(Debug, Default)]
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn publish(&self, _event: PresenceEvent) {}
}
