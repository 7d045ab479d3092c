//! Synchronization primitives shared across the periodic task set:
//! `SharedState` (atomic vehicle-state snapshot), `CircularBuffer`
//! (bounded ring of filtered samples), `EventBus` (per-kind event
//! queues with wait-for-any semantics) and the bounded command/route
//! queues.
//!
//! Lock discipline: each of `SharedState`, `CircularBuffer` and
//! `EventBus` owns its own mutex; none is acquired while holding
//! another (spec.md section 5's "no nested lock acquisition").

mod circular_buffer;
mod event_bus;
mod queue;
mod shared_state;

pub use circular_buffer::CircularBuffer;
pub use event_bus::{EventBus, EventSubscription};
pub use queue::{CommandQueue, RouteQueue};
pub use shared_state::SharedState;
