//! Event bus: fan-out of published events to every handler queue.
//!
//! Every handler subscribes once and receives its own [`EventQueue`]. A call
//! to [`EventBus::publish`] enqueues the same `Arc<Event>` onto every live
//! queue and returns immediately. Queues are unbounded, so nothing is dropped
//! while the receiving handler is alive.
//!
//! Publishing holds the subscriber lock for the whole fan-out, which gives
//! every queue the same relative order of events, and in particular keeps
//! events from one publisher in the order they were published.

use herald_proto::Event;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

struct Subscriber {
    name: &'static str,
    tx: mpsc::UnboundedSender<Arc<Event>>,
}

/// Cloneable handle to the process event bus.
///
/// Components receive a handle at construction time instead of reaching for
/// a global.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue that will receive every event published from now on.
    pub fn subscribe(&self, name: &'static str) -> EventQueue {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock();
        subscribers.push(Subscriber { name, tx });
        debug!(subscriber = name, total = subscribers.len(), "Queue subscribed");
        EventQueue { name, rx }
    }

    /// Publish an event to every queue. Returns the number of queues reached.
    ///
    /// Queues whose handler has gone away are pruned.
    pub fn publish(&self, event: impl Into<Event>) -> usize {
        let event = Arc::new(event.into());
        let kind = event.kind().name();

        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|sub| match sub.tx.send(Arc::clone(&event)) {
            Ok(()) => true,
            Err(_) => {
                debug!(subscriber = sub.name, "Pruning closed queue");
                false
            }
        });
        let delivered = subscribers.len();
        drop(subscribers);

        trace!(kind, delivered, pruned = before - delivered, "Event published");
        crate::metrics::record_publish(kind, delivered);
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// One handler's ordered inbox.
pub struct EventQueue {
    name: &'static str,
    rx: mpsc::UnboundedReceiver<Arc<Event>>,
}

impl EventQueue {
    /// Name the queue was subscribed under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wait for the next event. `None` once every bus handle is dropped.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        self.rx.try_recv().ok()
    }
}
