//! NavigationControl (period 50 ms, spec.md §4.11): drives the closed
//! loop PID inner loop, with bumpless transfer across MANUAL/AUTOMATIC
//! transitions and fault-driven controller shutdown.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/navigation_control.py`.
//! Per spec.md §9's design note, this task subscribes for its own
//! private copy of `EMERGENCY_STOP`/`ELECTRICAL_FAULT`/`HYDRAULIC_FAULT`
//! via `EventBus::subscribe` — fan-out "(a)" — so its fault response
//! can never be stolen by another consumer (e.g. `CommandLogic`'s
//! observability drain) draining the same kind first from a shared
//! queue.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::control::{AngularController, VelocityController};
use crate::model::{EventKind, VehicleStatus};
use crate::sync::{EventBus, EventSubscription, SharedState};

use super::{new_stop_flag, run_periodic, StopFlag};

const FAULT_EVENT_KINDS: [EventKind; 3] =
    [EventKind::EmergencyStop, EventKind::ElectricalFault, EventKind::HydraulicFault];

pub struct NavigationControlTask {
    state: Arc<SharedState>,
    fault_events: EventSubscription,
    velocity: VelocityController,
    angular: AngularController,
    period: Duration,
    stop: StopFlag,

    prev_automatic: bool,
}

impl NavigationControlTask {
    /// `event_bus` is only borrowed to register a dedicated
    /// subscription — the task never touches the bus's shared default
    /// queue afterwards.
    pub fn new(
        state: Arc<SharedState>,
        event_bus: &EventBus,
        velocity: VelocityController,
        angular: AngularController,
        period: Duration,
    ) -> Self {
        Self {
            state,
            fault_events: event_bus.subscribe(),
            velocity,
            angular,
            period,
            stop: new_stop_flag(),
            prev_automatic: false,
        }
    }

    pub fn stop_flag(&self) -> StopFlag {
        Arc::clone(&self.stop)
    }

    pub fn run(mut self) {
        let period = self.period;
        let stop = Arc::clone(&self.stop);
        run_periodic(&stop, period, move || self.tick());
    }

    fn tick(&mut self) {
        let state = self.state.snapshot();
        let now_automatic = state.is_automatic();

        if now_automatic && !self.prev_automatic {
            self.velocity.enable(state.v);
            self.angular.enable(state.theta);
            info!("[NavigationControl] controllers enabled (bumpless transfer)");
        } else if !now_automatic && self.prev_automatic {
            self.velocity.disable();
            self.angular.disable();
            info!("[NavigationControl] controllers disabled");
        }
        self.prev_automatic = now_automatic;

        let faulted = matches!(state.status, VehicleStatus::Fault | VehicleStatus::Emergency);
        if now_automatic && !faulted {
            let accel_cmd = self.velocity.compute(state.v, state.v_setpoint);
            let steer_cmd = self.angular.compute(state.theta, state.theta_setpoint);
            self.state.set_actuators(accel_cmd, steer_cmd);
        } else if state.is_manual() && state.status != VehicleStatus::Fault {
            // Bumpless safeguard: keep the setpoints tracking the current
            // motion so a later switch to AUTOMATIC continues from here.
            self.state.set_setpoints(Some(state.v), Some(state.theta));
        }

        self.drain_fault_events();
    }

    fn drain_fault_events(&mut self) {
        while let Some(event) = self.fault_events.check_any(&FAULT_EVENT_KINDS) {
            info!("[NavigationControl] fault event {:?} - disabling control", event.kind);
            self.velocity.disable();
            self.angular.disable();
            self.state.set_actuators(0.0, 0.0);
        }
    }
}
