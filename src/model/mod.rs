//! Shared data model: pose, sensor/actuator payloads, commands, events, log rows.
//!
//! Plain value types throughout — `SharedState` hands these out as copies
//! (see `crate::sync::shared_state`), so nothing here borrows across a lock.

mod command;
mod event;
mod log_entry;
mod sensor;
mod vehicle;

pub use command::{Command, CommandKind};
pub use event::{Event, EventKind};
pub use log_entry::LogEntry;
pub use sensor::{ActuatorCommand, FilteredSample, SensorSample};
pub use vehicle::{OperationMode, VehicleState, VehicleStatus};

/// Threshold above which `SharedState::has_fault` considers temperature a fault.
pub const TEMPERATURE_FAULT_THRESHOLD_C: f64 = 100.0;

/// Wraps an angle into `[-pi, pi]` via `atan2(sin a, cos a)` — the shortest
/// signed turn, never a raw `+/- 2*pi` jump.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn normalize_is_idempotent() {
        let a = normalize_angle(1.2345);
        assert!((normalize_angle(a) - a).abs() < 1e-12);
    }

    #[test]
    fn normalize_strips_full_turns() {
        let a = 0.7;
        assert!((normalize_angle(a + 2.0 * PI) - normalize_angle(a)).abs() < 1e-9);
    }

    #[test]
    fn normalize_wrap_example() {
        // spec.md scenario 2: current=3.10, target=-3.10 -> small positive error
        let current = 3.10_f64;
        let target = -3.10_f64;
        let err = normalize_angle(target - current);
        assert!((err - 0.0831853).abs() < 1e-5, "got {err}");
    }
}
