//! In-process publish/subscribe bus for domain [`Event`]s.
//!
//! Every [`EventBus::subscribe`] call registers an independent bounded queue.
//! [`EventBus::publish`] hands a clone of the event to every queue registered
//! at that moment, in call order, and waits while a queue is full. Events
//! published with no subscriber are dropped, never buffered for later ones.
//!
//! Dropping a [`Subscription`] unsubscribes it: its queue is pruned from the
//! registry by the next publish.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use super::event::Event;

/// Default per-subscriber queue capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cloneable handle to a single process-wide event bus.
///
/// Construct one during bootstrap and pass clones to every producer and
/// consumer; all clones share the same subscriber registry.
#[derive(Debug, Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<Event>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus whose subscriber queues hold up to `capacity` events.
    ///
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    ///
    /// The subscriber sees every event published after this call returns.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        self.registry().push(sender);
        tracing::debug!(capacity = self.capacity, "Event bus subscriber registered");
        Subscription { receiver }
    }

    /// Delivers `event` to every registered subscriber.
    ///
    /// Waits while a subscriber's queue is full. Returns how many subscribers
    /// accepted the event; `0` means it was dropped.
    pub async fn publish(&self, event: Event) -> usize {
        let kind = event.kind();

        // Snapshot under the lock, send outside it: a concurrent subscribe
        // is either fully in the snapshot or not at all.
        let senders: Vec<mpsc::Sender<Event>> = {
            let mut subscribers = self.registry();
            subscribers.retain(|sender| !sender.is_closed());
            subscribers.clone()
        };

        if senders.is_empty() {
            tracing::debug!(event = kind, "No subscribers, event dropped");
            metrics::counter!("events_dropped_total", "event" => kind).increment(1);
            return 0;
        }

        let mut delivered = 0;
        for sender in senders {
            if sender.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }

        metrics::counter!("events_published_total", "event" => kind).increment(1);
        delivered
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry()
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }

    /// Per-subscriber queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn registry(&self) -> MutexGuard<'_, Vec<mpsc::Sender<Event>>> {
        // The registry is a plain Vec; a panic elsewhere cannot leave it half-updated.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receiving end of one subscription.
///
/// An ordered, lazy sequence of events: use [`Subscription::recv`] or the
/// [`Stream`] implementation. It only ends once every [`EventBus`] clone is gone.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<Event>,
}

impl Subscription {
    /// Waits for the next event.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.receiver.poll_recv(cx)
    }
}
