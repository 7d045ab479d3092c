//! Velocity PID wrapper: acts directly on `(v_meas, v_sp)`, output in
//! `[-1, 1]` read as an acceleration command.
//!
//! Grounded on
//! `examples/original_source/src/embedded/control/velocity_controller.py`.

use crate::error::ConfigError;

use super::pid::PidController;

pub struct VelocityController {
    pid: PidController,
    enabled: bool,
}

impl VelocityController {
    pub fn new(kp: f64, ki: f64, kd: f64, max_accel: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            pid: PidController::new(kp, ki, kd, -max_accel, max_accel, 0.05)?,
            enabled: false,
        })
    }

    pub fn compute(&mut self, current_velocity: f64, target_velocity: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        self.pid.compute(current_velocity, target_velocity)
    }

    /// Bumpless enable primed with the current velocity.
    pub fn enable(&mut self, current_velocity: f64) {
        self.enabled = true;
        self.pid.enable(current_velocity);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.pid.disable();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reset(&mut self) {
        self.pid.reset();
    }
}
