//! Hand-rolled PID controller with sample-time gating, anti-windup and
//! bumpless enable/disable.
//!
//! Grounded on `examples/original_source/src/embedded/control/pid_controller.py`.
//! The teacher's `component_b::controller::Controller` wraps the `pidgeon`
//! crate for a generic virtual-actuator PID, but that crate doesn't expose
//! the exact sample-time hold / bounded-integral-clamp / bumpless-enable
//! semantics this system is tested against (spec.md section 8), so this is
//! a direct, explicit struct in the teacher's own idiom instead — `Instant`
//! based `dt`, clamped output, `compute`/`enable`/`disable`/`reset` methods
//! mirroring `Controller::handle_packet`'s shape.

use std::time::Instant;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    out_min: f64,
    out_max: f64,
    sample_time: f64,

    integral: f64,
    last_error: f64,
    last_time: Option<Instant>,
    last_output: f64,
    setpoint: f64,
    enabled: bool,
}

impl PidController {
    pub fn new(
        kp: f64,
        ki: f64,
        kd: f64,
        out_min: f64,
        out_max: f64,
        sample_time: f64,
    ) -> Result<Self, ConfigError> {
        if out_min >= out_max {
            return Err(ConfigError::InvalidOutputRange { out_min, out_max });
        }
        if sample_time <= 0.0 {
            return Err(ConfigError::InvalidSampleTime { got: sample_time });
        }
        Ok(Self {
            kp,
            ki,
            kd,
            out_min,
            out_max,
            sample_time,
            integral: 0.0,
            last_error: 0.0,
            last_time: None,
            last_output: 0.0,
            setpoint: 0.0,
            enabled: false,
        })
    }

    /// `u = Kp*e + Ki*int(e dt) + Kd*de/dt`, sample-time gated and clamped.
    /// Returns 0 while disabled.
    pub fn compute(&mut self, measured_value: f64, setpoint: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }

        let now = Instant::now();

        let last_time = match self.last_time {
            None => {
                // First call after construction/enable: prime the time base,
                // hold the error baseline, bumpless output of 0.
                self.last_time = Some(now);
                self.last_error = setpoint - measured_value;
                self.setpoint = setpoint;
                return 0.0;
            }
            Some(t) => t,
        };

        let dt = now.duration_since(last_time).as_secs_f64();
        if dt < self.sample_time {
            return self.last_output;
        }

        let error = setpoint - measured_value;
        let p_term = self.kp * error;

        self.integral += error * dt;
        let max_integral = if self.ki != 0.0 {
            (self.out_max - self.out_min) / (2.0 * self.ki).abs()
        } else {
            1e6
        };
        self.integral = self.integral.clamp(-max_integral, max_integral);
        let i_term = self.ki * self.integral;

        let d_term = if dt > 0.0 {
            self.kd * (error - self.last_error) / dt
        } else {
            0.0
        };

        let output = (p_term + i_term + d_term).clamp(self.out_min, self.out_max);

        self.last_error = error;
        self.last_time = Some(now);
        self.last_output = output;
        self.setpoint = setpoint;

        output
    }

    /// Bumpless transfer into the active state: integral, last error and
    /// time base reset; setpoint captured so the first post-enable error
    /// reads near zero.
    pub fn enable(&mut self, current_value: f64) {
        self.enabled = true;
        self.setpoint = current_value;
        self.integral = 0.0;
        self.last_error = 0.0;
        self.last_time = None;
        self.last_output = 0.0;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clears integral/error/time base without changing enabled status.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.last_time = None;
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}
