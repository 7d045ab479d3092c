//! Bounded, non-blocking producer/consumer queues for commands and
//! planned routes.
//!
//! Grounded on the teacher's `component_a/sensor.rs` /
//! `component_b/receiver.rs` channel sizing pattern (bounded, sender
//! never blocks the producer thread) combined with
//! `examples/original_source/src/embedded/tasks/command_logic.py`'s
//! `Queue(maxsize=...)` — full queues drop the newest item and log it
//! rather than block, since a periodic task can never stall waiting on
//! a full queue. Built on `crossbeam_queue::ArrayQueue`, the same
//! lock-free ring the teacher uses in `sync_manager.rs`'s `LockFree` mode.

use crossbeam_queue::ArrayQueue;
use log::warn;

use crate::model::Command;

pub const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 50;
pub const DEFAULT_ROUTE_QUEUE_CAPACITY: usize = 10;

pub struct CommandQueue {
    inner: ArrayQueue<Command>,
}

impl CommandQueue {
    pub fn new(capacity: usize) -> Self {
        Self { inner: ArrayQueue::new(capacity.max(1)) }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_COMMAND_QUEUE_CAPACITY)
    }

    /// Drops and logs on overflow rather than blocking the caller.
    pub fn try_put(&self, command: Command) {
        if let Err(dropped) = self.inner.push(command) {
            warn!("command queue full, dropping {:?} from {}", dropped.kind, dropped.source);
        }
    }

    pub fn try_get(&self) -> Option<Command> {
        self.inner.pop()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

pub struct RouteQueue {
    inner: ArrayQueue<Vec<(f64, f64)>>,
}

impl RouteQueue {
    pub fn new(capacity: usize) -> Self {
        Self { inner: ArrayQueue::new(capacity.max(1)) }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_ROUTE_QUEUE_CAPACITY)
    }

    pub fn try_put(&self, route: Vec<(f64, f64)>) {
        if self.inner.push(route).is_err() {
            warn!("route queue full, dropping incoming route");
        }
    }

    pub fn try_get(&self) -> Option<Vec<(f64, f64)>> {
        self.inner.pop()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandKind;

    #[test]
    fn command_queue_is_fifo() {
        let q = CommandQueue::new(4);
        q.try_put(Command::local(CommandKind::Stop, 0.0));
        q.try_put(Command::local(CommandKind::EnableAutomatic, 1.0));
        assert_eq!(q.try_get().unwrap().kind, CommandKind::Stop);
        assert_eq!(q.try_get().unwrap().kind, CommandKind::EnableAutomatic);
        assert!(q.try_get().is_none());
    }

    #[test]
    fn command_queue_drops_on_overflow_without_panicking() {
        let q = CommandQueue::new(2);
        for _ in 0..5 {
            q.try_put(Command::local(CommandKind::Stop, 0.0));
        }
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn route_queue_round_trips() {
        let q = RouteQueue::new(2);
        q.try_put(vec![(0.0, 0.0), (1.0, 1.0)]);
        let got = q.try_get().unwrap();
        assert_eq!(got, vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(q.is_empty());
    }
}
