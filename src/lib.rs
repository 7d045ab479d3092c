//! On-board controller for an autonomous mine haul truck: a fleet of
//! periodic tasks sharing a lock-protected vehicle-state snapshot, a
//! bounded ring of filtered sensor samples, and a per-kind event bus,
//! closed over PID-based motion control and straight-line waypoint
//! following.
//!
//! See `README`/`DESIGN.md` for the module map; `main.rs` is the
//! embedded CLI driver that wires a `Controller` against the bundled
//! `sim::MineSensorSource` and an optional MQTT-shaped transport.

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod external;
pub mod filters;
pub mod model;
pub mod sim;
pub mod sync;
pub mod tasks;
