//! Typed in-process event bus.
//!
//! Publishing is synchronous and unbuffered: listeners registered at publish
//! time each get the event once; with no listeners the event is dropped.
//! Channel subscriptions are bounded; a subscriber that falls behind loses
//! events rather than stalling the publisher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::events::{AppEvent, EventKind};

pub type Callback = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Default per-subscriber queue depth.
pub const DEFAULT_SUBSCRIBER_QUEUE: usize = 1024;

/// Handle for removing a listener with [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Clone)]
enum Sink {
    Callback(Callback),
    Channel(mpsc::Sender<AppEvent>),
}

#[derive(Clone)]
struct Listener {
    /// `None` listens to everything.
    filter: Option<EventKind>,
    sink: Sink,
}

impl Listener {
    fn wants(&self, kind: EventKind) -> bool {
        self.filter.map_or(true, |f| f == kind)
    }
}

pub struct EventBus {
    listeners: DashMap<u64, Listener>,
    seq: AtomicU64,
    queue: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_queue(DEFAULT_SUBSCRIBER_QUEUE)
    }

    /// Bus whose channel subscriptions hold at most `queue` unread events.
    pub fn with_queue(queue: usize) -> Self {
        Self {
            listeners: DashMap::new(),
            seq: AtomicU64::new(1),
            queue: queue.max(1),
        }
    }

    pub fn on<F>(&self, kind: EventKind, f: F) -> ListenerId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.insert(Some(kind), Sink::Callback(Arc::new(f)))
    }

    pub fn on_any<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.insert(None, Sink::Callback(Arc::new(f)))
    }

    /// Channel listener for one kind. Dropping the receiver unregisters it.
    /// Events published while the queue is full are dropped for this
    /// subscriber only.
    pub fn subscribe(&self, kind: EventKind) -> mpsc::Receiver<AppEvent> {
        let (tx, rx) = mpsc::channel(self.queue);
        self.insert(Some(kind), Sink::Channel(tx));
        rx
    }

    pub fn subscribe_all(&self) -> mpsc::Receiver<AppEvent> {
        let (tx, rx) = mpsc::channel(self.queue);
        self.insert(None, Sink::Channel(tx));
        rx
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id.0).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every matching listener; returns how many got it.
    pub fn publish(&self, event: &AppEvent) -> usize {
        let kind = event.kind();

        // Snapshot first: callbacks may call `on`/`off` on this bus.
        let matched: Vec<(u64, Sink)> = self
            .listeners
            .iter()
            .filter(|e| e.value().wants(kind))
            .map(|e| (*e.key(), e.value().sink.clone()))
            .collect();

        let mut delivered = 0;
        for (id, sink) in matched {
            match sink {
                Sink::Callback(f) => {
                    f(event);
                    delivered += 1;
                }
                Sink::Channel(tx) => match tx.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(
                            listener = id,
                            event = event.name(),
                            "subscriber lagging, event dropped"
                        );
                    }
                    Err(TrySendError::Closed(_)) => {
                        self.listeners.remove(&id);
                    }
                },
            }
        }

        if delivered == 0 {
            tracing::trace!(event = event.name(), "no listener, event dropped");
        }
        delivered
    }

    fn insert(&self, filter: Option<EventKind>, sink: Sink) -> ListenerId {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, Listener { filter, sink });
        ListenerId(id)
    }
}
