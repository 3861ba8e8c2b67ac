//! Fire-and-forget click emission for the redirect path.

use tokio::task::JoinHandle;

use super::event::Event;
use super::event_bus::EventBus;

/// Publishes [`Event::LinkVisited`] without holding up the redirect response.
#[derive(Debug, Clone)]
pub struct ClickPublisher {
    bus: EventBus,
}

impl ClickPublisher {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Schedules a `LinkVisited` event for `link_id` on a detached task.
    ///
    /// Returns immediately. The task is not awaited by the redirect handler,
    /// may outlive the request, and its outcome is invisible to the visitor.
    /// With no subscriber registered the event is dropped.
    ///
    /// The returned handle resolves to the number of subscribers reached; it
    /// exists for tests and may simply be dropped.
    pub fn link_visited(&self, link_id: i64) -> JoinHandle<usize> {
        let bus = self.bus.clone();
        let event = Event::link_visited(link_id);

        tokio::spawn(async move {
            let delivered = bus.publish(event).await;
            if delivered == 0 {
                tracing::debug!(link_id, "Click not tracked: no active subscriber");
            }
            delivered
        })
    }
}
