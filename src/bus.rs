//! # Scoped Event Broadcast
//!
//! A context-scoped publish/subscribe channel with a deferred reaction
//! queue.
//!
//! ## Overview
//!
//! An [`EventBus`] mints [`Scope`] handles. A scope can:
//!
//! - [`subscribe`](Scope::subscribe) a listener to a named event;
//! - [`broadcast`](Scope::broadcast) a named event with a payload to its
//!   own listeners;
//! - [`defer`](Scope::defer) an arbitrary reaction.
//!
//! Nothing runs at call time. Broadcasts and deferred reactions are
//! queued on the bus and executed, in FIFO order, by the next
//! [`flush`](Scope::flush). Host runtimes that dispatch reader callbacks
//! out-of-band are expected to flush after their dispatch turn; tests
//! flush explicitly to make effects observable to synchronous assertions.
//!
//! Broadcast delivery is scope-isolated: a payload queued on one scope is
//! only ever seen by listeners subscribed on that same scope, under the
//! same event name.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Identifier of a [`Scope`] minted by an [`EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

// Listener callbacks are cloned out of the registry before they are
// invoked, so a callback may subscribe, unsubscribe, or broadcast without
// deadlocking the registry lock.
type Callback<T> = Arc<Mutex<dyn FnMut(&T) + Send>>;

struct Listener<T> {
    id: ListenerId,
    event: String,
    callback: Callback<T>,
}

enum Reaction<T> {
    Deliver {
        scope: ScopeId,
        event: String,
        payload: T,
    },
    Run(Box<dyn FnOnce() + Send>),
}

struct BusInner<T> {
    queue: Mutex<VecDeque<Reaction<T>>>,
    listeners: Mutex<HashMap<ScopeId, Vec<Listener<T>>>>,
    next_scope: AtomicU64,
    next_listener: AtomicU64,
}

/// Event bus holding the reaction queue and the listener registry.
///
/// Cheap to clone; clones share state. The payload type `T` is the same
/// for every event on the bus.
pub struct EventBus<T> {
    inner: Arc<BusInner<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> EventBus<T> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                queue: Mutex::new(VecDeque::new()),
                listeners: Mutex::new(HashMap::new()),
                next_scope: AtomicU64::new(0),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Mint a new scope on this bus.
    pub fn scope(&self) -> Scope<T> {
        let id = ScopeId(self.inner.next_scope.fetch_add(1, Ordering::Relaxed));
        Scope {
            id,
            bus: self.clone(),
        }
    }

    /// Drain the reaction queue in FIFO order.
    ///
    /// Runs deferred reactions and delivers queued broadcasts to the
    /// listeners of the originating scope. Reactions enqueued while the
    /// flush is running are drained by the same flush.
    pub fn flush(&self) {
        let mut drained = 0usize;
        loop {
            let reaction = self.inner.queue.lock().unwrap().pop_front();
            let Some(reaction) = reaction else { break };
            drained += 1;
            match reaction {
                Reaction::Run(reaction) => reaction(),
                Reaction::Deliver {
                    scope,
                    event,
                    payload,
                } => self.deliver(scope, &event, &payload),
            }
        }
        log::trace!("flushed {drained} queued reactions");
    }

    fn deliver(&self, scope: ScopeId, event: &str, payload: &T) {
        let targets: Vec<Callback<T>> = {
            let listeners = self.inner.listeners.lock().unwrap();
            listeners
                .get(&scope)
                .map(|scoped| {
                    scoped
                        .iter()
                        .filter(|listener| listener.event == event)
                        .map(|listener| Arc::clone(&listener.callback))
                        .collect()
                })
                .unwrap_or_default()
        };
        for callback in targets {
            (callback.lock().unwrap())(payload);
        }
    }

    fn enqueue(&self, reaction: Reaction<T>) {
        self.inner.queue.lock().unwrap().push_back(reaction);
    }

    fn register(&self, scope: ScopeId, event: String, callback: Callback<T>) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .lock()
            .unwrap()
            .entry(scope)
            .or_default()
            .push(Listener {
                id,
                event,
                callback,
            });
        id
    }
}

/// Context handle scoping broadcasts to one listener set.
///
/// Cheap to clone; clones refer to the same scope on the same bus.
pub struct Scope<T> {
    id: ScopeId,
    bus: EventBus<T>,
}

impl<T> Clone for Scope<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            bus: self.bus.clone(),
        }
    }
}

impl<T: Send + 'static> Scope<T> {
    /// This scope's identifier.
    #[inline]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Register a listener for `event` on this scope.
    ///
    /// The listener stays registered for the lifetime of the returned
    /// [`Subscription`]; dropping it deregisters.
    pub fn subscribe(
        &self,
        event: impl Into<String>,
        callback: impl FnMut(&T) + Send + 'static,
    ) -> Subscription<T> {
        let id = self
            .bus
            .register(self.id, event.into(), Arc::new(Mutex::new(callback)));
        Subscription {
            bus: self.bus.clone(),
            scope: self.id,
            id,
        }
    }

    /// Queue a named event with `payload` for this scope's listeners.
    ///
    /// Delivery happens on the next [`flush`](Self::flush), never at call
    /// time.
    pub fn broadcast(&self, event: impl Into<String>, payload: T) {
        self.bus.enqueue(Reaction::Deliver {
            scope: self.id,
            event: event.into(),
            payload,
        });
    }

    /// Queue an arbitrary reaction for the next processing tick.
    pub fn defer(&self, reaction: impl FnOnce() + Send + 'static) {
        self.bus.enqueue(Reaction::Run(Box::new(reaction)));
    }

    /// Drain the bus queue. See [`EventBus::flush`].
    pub fn flush(&self) {
        self.bus.flush();
    }
}

/// Listener registration handle returned by [`Scope::subscribe`].
///
/// Dropping the subscription deregisters the listener.
pub struct Subscription<T> {
    bus: EventBus<T>,
    scope: ScopeId,
    id: ListenerId,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut listeners = self.bus.inner.listeners.lock().unwrap();
        if let Some(scoped) = listeners.get_mut(&self.scope) {
            scoped.retain(|listener| listener.id != self.id);
            if scoped.is_empty() {
                listeners.remove(&self.scope);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&'static str) + Clone) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let log = Arc::clone(&log);
            move |entry: &'static str| log.lock().unwrap().push(entry.to_string())
        };
        (log, sink)
    }

    #[test]
    fn broadcast_is_deferred_until_flush() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let (log, sink) = recorder();

        let _sub = scope.subscribe("tick", move |_| sink("tick"));
        scope.broadcast("tick", 1);
        assert!(log.lock().unwrap().is_empty());

        scope.flush();
        assert_eq!(*log.lock().unwrap(), vec!["tick"]);
    }

    #[test]
    fn flush_runs_reactions_in_fifo_order() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let (log, sink) = recorder();

        let first = sink.clone();
        let second = sink.clone();
        let _sub = scope.subscribe("tick", move |_| second("delivery"));

        scope.defer(move || first("before"));
        scope.broadcast("tick", 1);
        scope.defer(move || sink("after"));
        scope.flush();

        assert_eq!(*log.lock().unwrap(), vec!["before", "delivery", "after"]);
    }

    #[test]
    fn delivery_is_scope_isolated() {
        let bus = EventBus::<u64>::new();
        let noisy = bus.scope();
        let quiet = bus.scope();
        let (log, sink) = recorder();

        let _sub = quiet.subscribe("tick", move |_| sink("leaked"));
        noisy.broadcast("tick", 1);
        bus.flush();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn listeners_filter_by_event_name() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let (log, sink) = recorder();

        let _sub = scope.subscribe("wanted", move |_| sink("wanted"));
        scope.broadcast("other", 1);
        scope.broadcast("wanted", 2);
        scope.flush();

        assert_eq!(*log.lock().unwrap(), vec!["wanted"]);
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let (log, sink) = recorder();

        let sub = scope.subscribe("tick", move |_| sink("tick"));
        drop(sub);
        scope.broadcast("tick", 1);
        scope.flush();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn reactions_queued_mid_flush_drain_in_same_flush() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let (log, sink) = recorder();

        let inner_scope = scope.clone();
        let nested = sink.clone();
        scope.defer(move || {
            sink("outer");
            inner_scope.defer(move || nested("inner"));
        });
        scope.flush();

        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn payload_reaches_listener_verbatim() {
        let bus = EventBus::<u64>::new();
        let scope = bus.scope();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _sub = scope.subscribe("tick", move |payload| sink.lock().unwrap().push(*payload));
        scope.broadcast("tick", 70);
        scope.broadcast("tick", 30);
        scope.flush();

        assert_eq!(*seen.lock().unwrap(), vec![70, 30]);
    }
}
