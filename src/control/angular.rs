//! Steering PID wrapper: wraps angular error into `[-pi, pi]` before the
//! PID ever sees it, so the derivative/integral terms never see a raw
//! +/-2*pi wrap jump.
//!
//! Grounded on
//! `examples/original_source/src/embedded/control/angular_controller.py`.

use crate::error::ConfigError;
use crate::model::normalize_angle;

use super::pid::PidController;

pub struct AngularController {
    pid: PidController,
    enabled: bool,
}

impl AngularController {
    pub fn new(kp: f64, ki: f64, kd: f64, max_steering: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            pid: PidController::new(kp, ki, kd, -max_steering, max_steering, 0.05)?,
            enabled: false,
        })
    }

    /// `error = normalize(target - current)`; the PID always sees
    /// `(current = 0, setpoint = error)` so it operates on a linear signal.
    pub fn compute(&mut self, current_angle: f64, target_angle: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        let error = normalize_angle(target_angle - current_angle);
        self.pid.compute(0.0, error)
    }

    /// Bumpless enable: the wrapped PID's zero baseline means the very
    /// next error is whatever the first `compute` call measures, not a
    /// stale prior setpoint.
    pub fn enable(&mut self, _current_angle: f64) {
        self.enabled = true;
        self.pid.enable(0.0);
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
