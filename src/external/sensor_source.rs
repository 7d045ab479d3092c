//! Abstract sensor capability the core reads every tick.
//!
//! Grounded on spec.md §6 ("Sensor source. Capability `read() ->
//! SensorSample`; non-blocking, always returns a fresh reading") and
//! the teacher's own `Sensor` abstraction in `component_a/sensor.rs`,
//! generalized from a concrete noisy generator into a trait so the
//! physics simulator stays a swappable collaborator, matching spec.md
//! §1's explicit non-goal.
//!
//! `clear_faults` resolves spec.md §9's open question: `RESET_FAULT`
//! must reach back into whatever is injecting electrical/hydraulic
//! faults, and the source is the only place that knows how.

use crate::model::SensorSample;

pub trait SensorSource: Send + Sync {
    /// Always returns a fresh reading; never blocks.
    fn read(&self) -> SensorSample;

    /// Feeds the most recent actuator command back into the source, so a
    /// simulated truck can integrate its own dynamics. A real adapter
    /// ignores this (actuation goes out through `ActuatorSink` instead).
    fn feed_actuation(&self, _acceleration: f64, _steering: f64) {}

    /// Clears any latched electrical/hydraulic fault condition at the
    /// source, in response to a `RESET_FAULT` command.
    fn clear_faults(&self);
}
