//! Operation mode, vehicle status, and the `SharedState` payload type.

use super::sensor::ActuatorCommand;
use super::TEMPERATURE_FAULT_THRESHOLD_C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    ManualLocal,
    AutomaticRemote,
}

impl Default for OperationMode {
    fn default() -> Self {
        OperationMode::ManualLocal
    }
}

impl OperationMode {
    pub fn name(&self) -> &'static str {
        match self {
            OperationMode::ManualLocal => "MANUAL_LOCAL",
            OperationMode::AutomaticRemote => "AUTOMATIC_REMOTE",
        }
    }
}

/// `EMERGENCY` dominates `FAULT`, which dominates `RUNNING`/`STOPPED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Stopped,
    Running,
    Fault,
    Emergency,
}

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Stopped
    }
}

impl VehicleStatus {
    pub fn name(&self) -> &'static str {
        match self {
            VehicleStatus::Stopped => "STOPPED",
            VehicleStatus::Running => "RUNNING",
            VehicleStatus::Fault => "FAULT",
            VehicleStatus::Emergency => "EMERGENCY",
        }
    }
}

/// The `SharedState` payload. Plain value type: cheap to clone, safe to
/// hand out of the lock as a deep copy (see `crate::sync::shared_state`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub truck_id: u32,

    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub v: f64,

    pub actuators: ActuatorCommand,

    pub v_setpoint: f64,
    pub theta_setpoint: f64,
    pub target: Option<(f64, f64)>,

    pub temperature_c: f64,
    pub electrical_fault: bool,
    pub hydraulic_fault: bool,
    pub emergency_stop: bool,

    pub mode: OperationMode,
    pub status: VehicleStatus,
}

impl VehicleState {
    pub fn new(truck_id: u32) -> Self {
        Self {
            truck_id,
            x: 0.0,
            y: 0.0,
            theta: 0.0,
            v: 0.0,
            actuators: ActuatorCommand::ZERO,
            v_setpoint: 0.0,
            theta_setpoint: 0.0,
            target: None,
            temperature_c: 0.0,
            electrical_fault: false,
            hydraulic_fault: false,
            emergency_stop: false,
            mode: OperationMode::ManualLocal,
            status: VehicleStatus::Stopped,
        }
    }

    #[inline]
    pub fn is_automatic(&self) -> bool {
        self.mode == OperationMode::AutomaticRemote
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        self.mode == OperationMode::ManualLocal
    }

    #[inline]
    pub fn has_fault(&self) -> bool {
        self.electrical_fault
            || self.hydraulic_fault
            || self.emergency_stop
            || self.temperature_c > TEMPERATURE_FAULT_THRESHOLD_C
    }
}
