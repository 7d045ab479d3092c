//! Mutex-guarded `VehicleState` with copy-out snapshot semantics.
//!
//! Grounded on
//! `examples/original_source/src/embedded/sync/shared_state.py`
//! (`get_state` deep-copies under the lock, per-field setters each take
//! the lock for the duration of the update). Uses `parking_lot::Mutex`,
//! matching the teacher's choice throughout `sync_manager.rs`.

use parking_lot::Mutex;

use crate::model::{ActuatorCommand, OperationMode, VehicleState, VehicleStatus};

pub struct SharedState {
    inner: Mutex<VehicleState>,
}

impl SharedState {
    pub fn new(truck_id: u32) -> Self {
        Self { inner: Mutex::new(VehicleState::new(truck_id)) }
    }

    /// Deep copy under the lock — callers never hold the lock across
    /// downstream work.
    pub fn snapshot(&self) -> VehicleState {
        *self.inner.lock()
    }

    pub fn set_pose(&self, x: f64, y: f64, theta: f64, v: f64) {
        let mut s = self.inner.lock();
        s.x = x;
        s.y = y;
        s.theta = theta;
        s.v = v;
    }

    pub fn set_actuators(&self, acceleration: f64, steering: f64) {
        self.inner.lock().actuators = ActuatorCommand::new(acceleration, steering);
    }

    pub fn set_mode(&self, mode: OperationMode) {
        self.inner.lock().mode = mode;
    }

    pub fn set_status(&self, status: VehicleStatus) {
        self.inner.lock().status = status;
    }

    pub fn set_setpoints(&self, v_setpoint: Option<f64>, theta_setpoint: Option<f64>) {
        let mut s = self.inner.lock();
        if let Some(v) = v_setpoint {
            s.v_setpoint = v;
        }
        if let Some(theta) = theta_setpoint {
            s.theta_setpoint = theta;
        }
    }

    pub fn set_target(&self, target: Option<(f64, f64)>) {
        self.inner.lock().target = target;
    }

    pub fn set_faults(
        &self,
        temperature: Option<f64>,
        electrical: Option<bool>,
        hydraulic: Option<bool>,
        emergency: Option<bool>,
    ) {
        let mut s = self.inner.lock();
        if let Some(t) = temperature {
            s.temperature_c = t;
        }
        if let Some(e) = electrical {
            s.electrical_fault = e;
        }
        if let Some(h) = hydraulic {
            s.hydraulic_fault = h;
        }
        if let Some(em) = emergency {
            s.emergency_stop = em;
        }
    }

    pub fn is_automatic(&self) -> bool {
        self.inner.lock().is_automatic()
    }

    pub fn is_manual(&self) -> bool {
        self.inner.lock().is_manual()
    }

    pub fn has_fault(&self) -> bool {
        self.inner.lock().has_fault()
    }

    pub fn actuators(&self) -> ActuatorCommand {
        self.inner.lock().actuators
    }

    pub fn pose(&self) -> (f64, f64, f64, f64) {
        let s = self.inner.lock();
        (s.x, s.y, s.theta, s.v)
    }

    pub fn setpoints(&self) -> (f64, f64) {
        let s = self.inner.lock();
        (s.v_setpoint, s.theta_setpoint)
    }
}
