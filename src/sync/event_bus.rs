//! Per-kind FIFO event queues with wait-for-any-with-timeout semantics,
//! fanned out to independent subscribers so two tasks watching the
//! same `EventKind` never steal each other's event.
//!
//! Grounded on
//! `examples/original_source/src/embedded/sync/event_manager.py`
//! (`EventManager.wait_for_event` scans the requested kinds in order and
//! pops the first match; a condition variable is notified on every
//! `emit`). Translated to `std::sync::{Mutex, Condvar}` the way the
//! teacher's `metrics.rs` background exporter waits on its own queue,
//! generalized from one shared queue to one-per-`EventKind` *per
//! subscriber* — `emit` copies the event into every subscriber's own
//! queue, so `check`/`check_any`/`wait_any` on one subscription can
//! never consume an event another subscription still needs.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::model::{Event, EventKind};

struct Inner {
    queues: HashMap<EventKind, VecDeque<Event>>,
    shutdown: bool,
}

impl Inner {
    fn new() -> Self {
        Self { queues: HashMap::new(), shutdown: false }
    }
}

/// One subscriber's private copy of the event stream.
struct Subscriber {
    inner: Mutex<Inner>,
    cv: Condvar,
}

impl Subscriber {
    fn new() -> Self {
        Self { inner: Mutex::new(Inner::new()), cv: Condvar::new() }
    }

    fn push(&self, event: Event) {
        let mut inner = self.inner.lock().unwrap();
        inner.queues.entry(event.kind).or_default().push_back(event);
        self.cv.notify_all();
    }

    fn check(&self, kind: EventKind) -> Option<Event> {
        let mut inner = self.inner.lock().unwrap();
        inner.queues.get_mut(&kind).and_then(VecDeque::pop_front)
    }

    fn check_any(&self, kinds: &[EventKind]) -> Option<Event> {
        let mut inner = self.inner.lock().unwrap();
        Self::pop_first_match(&mut inner, kinds)
    }

    fn wait_any(&self, kinds: &[EventKind], timeout: Duration) -> Option<Event> {
        let mut inner = self.inner.lock().unwrap();
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(event) = Self::pop_first_match(&mut inner, kinds) {
                return Some(event);
            }
            if inner.shutdown {
                return None;
            }
            let now = std::time::Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, result) = self.cv.wait_timeout(inner, deadline - now).unwrap();
            inner = guard;
            if result.timed_out() && Self::pop_first_match(&mut inner, kinds).is_none() {
                return None;
            }
        }
    }

    fn pop_first_match(inner: &mut Inner, kinds: &[EventKind]) -> Option<Event> {
        for kind in kinds {
            if let Some(q) = inner.queues.get_mut(kind) {
                if let Some(event) = q.pop_front() {
                    return Some(event);
                }
            }
        }
        None
    }

    fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.shutdown = true;
        self.cv.notify_all();
    }

    fn is_shutdown(&self) -> bool {
        self.inner.lock().unwrap().shutdown
    }
}

/// An independent fan-out subscription: events emitted on the
/// `EventBus` after `subscribe()` are copied into this handle's own
/// queue, never shared with any other subscriber or with the bus's
/// built-in default queue.
pub struct EventSubscription {
    subscriber: Arc<Subscriber>,
}

impl EventSubscription {
    /// Non-blocking pop of the oldest event of `kind`, if any.
    pub fn check(&self, kind: EventKind) -> Option<Event> {
        self.subscriber.check(kind)
    }

    /// Non-blocking pop of the first match across `kinds`, scanned in
    /// the order given.
    pub fn check_any(&self, kinds: &[EventKind]) -> Option<Event> {
        self.subscriber.check_any(kinds)
    }

    /// Blocks until an event of one of `kinds` is available, `timeout`
    /// elapses, or the bus is shut down.
    pub fn wait_any(&self, kinds: &[EventKind], timeout: Duration) -> Option<Event> {
        self.subscriber.wait_any(kinds, timeout)
    }

    pub fn is_shutdown(&self) -> bool {
        self.subscriber.is_shutdown()
    }
}

/// Fans every emitted event out to the bus's own built-in ("default")
/// queue plus any `EventSubscription`s registered via `subscribe()`.
/// Existing callers that never subscribe keep consuming the default
/// queue through `check`/`check_any`/`wait_any`, unaffected by anyone
/// else subscribing.
pub struct EventBus {
    default: Arc<Subscriber>,
    subscribers: Mutex<Vec<Arc<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        let default = Arc::new(Subscriber::new());
        Self { subscribers: Mutex::new(vec![Arc::clone(&default)]), default }
    }

    /// Registers a new independent subscription. Events emitted from
    /// this point on are delivered to it; it never competes with the
    /// default queue or any other subscription for the same event.
    pub fn subscribe(&self) -> EventSubscription {
        let subscriber = Arc::new(Subscriber::new());
        if self.default.is_shutdown() {
            subscriber.shutdown();
        }
        self.subscribers.lock().unwrap().push(Arc::clone(&subscriber));
        EventSubscription { subscriber }
    }

    pub fn emit(&self, event: Event) {
        let subscribers = self.subscribers.lock().unwrap();
        for subscriber in subscribers.iter() {
            subscriber.push(event.clone());
        }
    }

    /// Non-blocking pop of the oldest event of `kind`, if any, from the
    /// bus's default queue.
    pub fn check(&self, kind: EventKind) -> Option<Event> {
        self.default.check(kind)
    }

    /// Non-blocking pop of the first match across `kinds`, scanned in
    /// the order given (same tie-break as `wait_any`, minus the wait),
    /// from the bus's default queue.
    pub fn check_any(&self, kinds: &[EventKind]) -> Option<Event> {
        self.default.check_any(kinds)
    }

    /// Blocks until an event of one of `kinds` is available on the
    /// default queue (returning the first match, scanned in the order
    /// given), `timeout` elapses, or `shutdown` is called. Returns
    /// `None` on timeout or shutdown.
    pub fn wait_any(&self, kinds: &[EventKind], timeout: Duration) -> Option<Event> {
        self.default.wait_any(kinds, timeout)
    }

    /// Sticky: once set, every blocked and future `wait_any`/`subscribe`
    /// call on the default queue and on every existing subscription
    /// returns/observes shutdown promptly.
    pub fn shutdown(&self) {
        let subscribers = self.subscribers.lock().unwrap();
        for subscriber in subscribers.iter() {
            subscriber.shutdown();
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.default.is_shutdown()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Payload;
    use std::sync::Arc as StdArc;
    use std::thread;

    #[test]
    fn check_is_non_blocking_fifo() {
        let bus = EventBus::new();
        bus.emit(Event::empty(EventKind::NewRoute, 1.0));
        bus.emit(Event::empty(EventKind::NewRoute, 2.0));
        assert_eq!(bus.check(EventKind::NewRoute).unwrap().t, 1.0);
        assert_eq!(bus.check(EventKind::NewRoute).unwrap().t, 2.0);
        assert!(bus.check(EventKind::NewRoute).is_none());
    }

    #[test]
    fn check_any_is_non_blocking_and_scans_in_order() {
        let bus = EventBus::new();
        assert!(bus.check_any(&[EventKind::ElectricalFault, EventKind::HydraulicFault]).is_none());
        bus.emit(Event::empty(EventKind::HydraulicFault, 1.0));
        bus.emit(Event::empty(EventKind::ElectricalFault, 2.0));
        let got = bus.check_any(&[EventKind::ElectricalFault, EventKind::HydraulicFault]).unwrap();
        assert_eq!(got.kind, EventKind::ElectricalFault);
    }

    #[test]
    fn wait_any_scans_kinds_in_order() {
        let bus = EventBus::new();
        bus.emit(Event::empty(EventKind::TargetReached, 1.0));
        bus.emit(Event::empty(EventKind::EmergencyStop, 2.0));
        let got = bus
            .wait_any(&[EventKind::EmergencyStop, EventKind::TargetReached], Duration::from_millis(10))
            .unwrap();
        assert_eq!(got.kind, EventKind::EmergencyStop);
    }

    #[test]
    fn wait_any_times_out_when_empty() {
        let bus = EventBus::new();
        let got = bus.wait_any(&[EventKind::Shutdown], Duration::from_millis(20));
        assert!(got.is_none());
    }

    #[test]
    fn emit_wakes_a_blocked_waiter() {
        let bus = StdArc::new(EventBus::new());
        let bus2 = StdArc::clone(&bus);
        let handle = thread::spawn(move || {
            bus2.wait_any(&[EventKind::FaultCleared], Duration::from_secs(2))
        });
        thread::sleep(Duration::from_millis(20));
        bus.emit(Event::new(EventKind::FaultCleared, Payload::new(), 42.0));
        let got = handle.join().unwrap();
        assert_eq!(got.unwrap().t, 42.0);
    }

    #[test]
    fn shutdown_releases_waiters() {
        let bus = StdArc::new(EventBus::new());
        let bus2 = StdArc::clone(&bus);
        let handle = thread::spawn(move || {
            bus2.wait_any(&[EventKind::Shutdown], Duration::from_secs(5))
        });
        thread::sleep(Duration::from_millis(20));
        bus.shutdown();
        assert!(handle.join().unwrap().is_none());
        assert!(bus.is_shutdown());
    }

    #[test]
    fn subscription_gets_its_own_copy_independent_of_default_queue() {
        let bus = EventBus::new();
        let sub = bus.subscribe();

        bus.emit(Event::empty(EventKind::ElectricalFault, 1.0));

        // The subscription consumes the event without taking it away
        // from the bus's default queue, and vice versa.
        assert!(sub.check(EventKind::ElectricalFault).is_some());
        assert!(bus.check(EventKind::ElectricalFault).is_some());
        assert!(sub.check(EventKind::ElectricalFault).is_none());
        assert!(bus.check(EventKind::ElectricalFault).is_none());
    }

    #[test]
    fn two_subscriptions_each_see_every_emitted_event() {
        let bus = EventBus::new();
        let sub_a = bus.subscribe();
        let sub_b = bus.subscribe();

        bus.emit(Event::empty(EventKind::HydraulicFault, 1.0));

        assert!(sub_a.check_any(&[EventKind::HydraulicFault]).is_some());
        assert!(sub_b.check_any(&[EventKind::HydraulicFault]).is_some());
    }

    #[test]
    fn shutdown_propagates_to_existing_subscriptions() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        bus.shutdown();
        assert!(sub.is_shutdown());
        assert!(sub.wait_any(&[EventKind::Shutdown], Duration::from_millis(20)).is_none());
    }
}
