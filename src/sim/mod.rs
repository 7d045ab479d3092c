//! Minimal example `SensorSource` so the binary runs end to end without
//! a real truck (spec.md §1 non-goal: "physics simulator ... only a
//! `SensorSource`/`ActuatorSink` seam plus a minimal example
//! implementation").

mod mine_sensor_source;

pub use mine_sensor_source::{MineSensorSource, SimActuatorSink};
