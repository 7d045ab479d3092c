//! Minimal example `SensorSource`: a first-order vehicle dynamics
//! integrator plus Gaussian-ish noise and occasional randomly injected
//! faults, so the binary runs end to end without real hardware.
//!
//! Grounded on
//! `examples/original_source/src/simulation/{mine_simulator,
//! vehicle_dynamics,noise_generator,random_fault_generator}.py`: first-order
//! lag toward a commanded velocity/angular-velocity (`tau_velocity`,
//! `tau_angular`), per-channel noise, and low-probability fault
//! injection latched until `clear_faults`. Noise uses the teacher's own
//! `rand::random_range` idiom from `component_a/sensor.rs` rather than
//! a Gaussian-sampling crate, since the teacher doesn't depend on one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::random_range;

use std::sync::Arc;

use crate::external::{ActuatorSink, SensorSource};
use crate::model::{normalize_angle, ActuatorCommand, SensorSample};

struct Dynamics {
    x: f64,
    y: f64,
    theta: f64,
    v: f64,
    omega: f64,
}

pub struct MineSensorSource {
    dynamics: Mutex<Dynamics>,
    actuation: Mutex<(f64, f64)>,
    electrical_fault: AtomicBool,
    hydraulic_fault: AtomicBool,
    max_velocity: f64,
    max_angular_velocity: f64,
    tau_velocity: f64,
    tau_angular: f64,
    dt: f64,
    enable_noise: bool,
    electrical_fault_probability: f64,
    hydraulic_fault_probability: f64,
    tick: AtomicU64,
}

impl MineSensorSource {
    pub fn new(start_x: f64, start_y: f64, dt: f64) -> Self {
        Self {
            dynamics: Mutex::new(Dynamics { x: start_x, y: start_y, theta: 0.0, v: 0.0, omega: 0.0 }),
            actuation: Mutex::new((0.0, 0.0)),
            electrical_fault: AtomicBool::new(false),
            hydraulic_fault: AtomicBool::new(false),
            max_velocity: 10.0,
            max_angular_velocity: 1.0,
            tau_velocity: 0.5,
            tau_angular: 0.3,
            dt,
            enable_noise: true,
            electrical_fault_probability: 0.0005,
            hydraulic_fault_probability: 0.0005,
            tick: AtomicU64::new(0),
        }
    }

    fn noisy(&self, value: f64, std_dev: f64) -> f64 {
        if !self.enable_noise || std_dev <= 0.0 {
            return value;
        }
        value + random_range(-std_dev..std_dev)
    }

    fn maybe_inject_faults(&self) {
        if !self.electrical_fault.load(Ordering::Acquire)
            && random_range(0.0..1.0) < self.electrical_fault_probability
        {
            self.electrical_fault.store(true, Ordering::Release);
        }
        if !self.hydraulic_fault.load(Ordering::Acquire)
            && random_range(0.0..1.0) < self.hydraulic_fault_probability
        {
            self.hydraulic_fault.store(true, Ordering::Release);
        }
    }
}

impl SensorSource for MineSensorSource {
    fn read(&self) -> SensorSample {
        self.tick.fetch_add(1, Ordering::Relaxed);
        self.maybe_inject_faults();

        let (accel_cmd, steer_cmd) = {
            let a = self.actuation.lock();
            (a.0.clamp(-1.0, 1.0), a.1.clamp(-1.0, 1.0))
        };

        let (x, y, theta, v) = {
            let mut d = self.dynamics.lock();
            let target_v = accel_cmd * self.max_velocity;
            let target_omega = steer_cmd * self.max_angular_velocity;
            d.v += (target_v - d.v) * self.dt / self.tau_velocity;
            d.omega += (target_omega - d.omega) * self.dt / self.tau_angular;
            d.x += d.v * d.theta.cos() * self.dt;
            d.y += d.v * d.theta.sin() * self.dt;
            d.theta = normalize_angle(d.theta + d.omega * self.dt);
            (d.x, d.y, d.theta, d.v)
        };

        let temperature_c = 25.0 + v.abs() * 2.0 + accel_cmd.abs() * 5.0;

        SensorSample {
            x: self.noisy(x, 0.05),
            y: self.noisy(y, 0.05),
            theta: normalize_angle(self.noisy(theta, 0.02)),
            v: self.noisy(v, 0.1),
            temperature_c: self.noisy(temperature_c, 2.0),
            electrical_fault: self.electrical_fault.load(Ordering::Acquire),
            hydraulic_fault: self.hydraulic_fault.load(Ordering::Acquire),
            t: now_secs(),
        }
    }

    fn feed_actuation(&self, acceleration: f64, steering: f64) {
        *self.actuation.lock() = (acceleration, steering);
    }

    fn clear_faults(&self) {
        self.electrical_fault.store(false, Ordering::Release);
        self.hydraulic_fault.store(false, Ordering::Release);
    }
}

/// `ActuatorSink` that feeds commands straight back into a
/// `MineSensorSource`'s own dynamics integrator -- the simulated stand-in
/// for a real actuator bus, since here the "plant" and the "sensor" are
/// the same process (spec.md §1's `ActuatorSink` seam, §6's "the core
/// drives it indirectly via SharedState -- an external adapter is free
/// to poll SharedState and forward").
pub struct SimActuatorSink {
    source: Arc<MineSensorSource>,
}

impl SimActuatorSink {
    pub fn new(source: Arc<MineSensorSource>) -> Self {
        Self { source }
    }
}

impl ActuatorSink for SimActuatorSink {
    fn write(&self, command: ActuatorCommand) {
        self.source.feed_actuation(command.acceleration(), command.steering());
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
