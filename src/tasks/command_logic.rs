//! CommandLogic (period 100 ms, spec.md §4.10): drains `CommandQueue`,
//! mirrors the latest filtered sample into `SharedState`, recomputes
//! `VehicleStatus`, and drains fault events for observability.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/command_logic.py`.
//! `RESET_FAULT` additionally calls back into the `SensorSource` (see
//! `external::sensor_source`'s doc comment — spec.md §9's open
//! question).

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::external::SensorSource;
use crate::model::{Command, CommandKind, Event, EventKind, OperationMode, Payload, PayloadValue, VehicleStatus};
use crate::sync::{CircularBuffer, CommandQueue, EventBus, SharedState};

use super::{new_stop_flag, run_periodic, StopFlag};

pub struct CommandLogicTask {
    buffer: Arc<CircularBuffer>,
    state: Arc<SharedState>,
    event_bus: Arc<EventBus>,
    commands: Arc<CommandQueue>,
    sensor_source: Arc<dyn SensorSource>,
    period: Duration,
    stop: StopFlag,
}

impl CommandLogicTask {
    pub fn new(
        buffer: Arc<CircularBuffer>,
        state: Arc<SharedState>,
        event_bus: Arc<EventBus>,
        commands: Arc<CommandQueue>,
        sensor_source: Arc<dyn SensorSource>,
        period: Duration,
    ) -> Self {
        Self { buffer, state, event_bus, commands, sensor_source, period, stop: new_stop_flag() }
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
        self.drain_commands();

        if let Some(latest) = self.buffer.latest() {
            self.state.set_pose(latest.x, latest.y, latest.theta, latest.v);
            self.state.set_faults(
                Some(latest.temperature_c),
                Some(latest.electrical_fault),
                Some(latest.hydraulic_fault),
                None,
            );
        }

        self.update_status();
        self.drain_fault_events_for_observability();
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.try_get() {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        let t = command.t;
        match command.kind {
            CommandKind::EnableAutomatic => {
                self.state.set_mode(OperationMode::AutomaticRemote);
                self.state.set_actuators(0.0, 0.0);
                self.state.set_setpoints(Some(0.0), Some(0.0));
                self.event_bus.emit(Event::new(
                    EventKind::ModeChanged,
                    Payload::new().with("mode", PayloadValue::Text("AUTOMATIC".into())),
                    t,
                ));
            }
            CommandKind::DisableAutomatic => {
                self.state.set_mode(OperationMode::ManualLocal);
                self.state.set_actuators(0.0, 0.0);
                self.state.set_setpoints(Some(0.0), Some(0.0));
                self.event_bus.emit(Event::new(
                    EventKind::ModeChanged,
                    Payload::new().with("mode", PayloadValue::Text("MANUAL".into())),
                    t,
                ));
            }
            CommandKind::EmergencyStop => {
                self.state.set_faults(None, None, None, Some(true));
                self.state.set_status(VehicleStatus::Emergency);
                self.state.set_actuators(0.0, 0.0);
                self.event_bus.emit(Event::empty(EventKind::EmergencyStop, t));
            }
            CommandKind::ResetEmergency => {
                self.state.set_faults(None, None, None, Some(false));
                self.event_bus.emit(Event::empty(EventKind::EmergencyReset, t));
            }
            CommandKind::ResetFault => {
                self.state.set_faults(None, Some(false), Some(false), None);
                self.sensor_source.clear_faults();
            }
            CommandKind::Stop => {
                self.state.set_actuators(0.0, 0.0);
                self.state.set_setpoints(Some(0.0), Some(0.0));
            }
            CommandKind::Shutdown => {
                info!("shutdown command received");
                self.event_bus.emit(Event::empty(EventKind::Shutdown, t));
            }
            manual_only => {
                if self.state.is_manual() {
                    self.execute_manual(manual_only, command.value);
                }
            }
        }
    }

    /// `ACCELERATE`/`BRAKE`/`MOVE_FORWARD`/`MOVE_BACKWARD` set
    /// acceleration and zero steering; `STEER_*`/`TURN_*` preserve the
    /// current acceleration and set steering. Defaults are +/-0.5 per
    /// spec.md §4.10's table. Only reachable while mode = MANUAL.
    fn execute_manual(&mut self, kind: CommandKind, value: Option<f64>) {
        let current_accel = self.state.actuators().acceleration();
        match kind {
            CommandKind::Accelerate | CommandKind::MoveForward => {
                self.state.set_actuators(value.unwrap_or(0.5), 0.0);
            }
            CommandKind::Brake | CommandKind::MoveBackward => {
                self.state.set_actuators(value.unwrap_or(-0.5), 0.0);
            }
            CommandKind::SteerLeft | CommandKind::TurnLeft => {
                self.state.set_actuators(current_accel, value.unwrap_or(0.5));
            }
            CommandKind::SteerRight | CommandKind::TurnRight => {
                self.state.set_actuators(current_accel, value.unwrap_or(-0.5));
            }
            _ => {}
        }
    }

    /// Status dominance: EMERGENCY > FAULT > RUNNING > STOPPED, computed
    /// last each tick (spec.md §4.10).
    fn update_status(&mut self) {
        let state = self.state.snapshot();
        let status = if state.emergency_stop {
            VehicleStatus::Emergency
        } else if state.has_fault() {
            VehicleStatus::Fault
        } else {
            let moving = state.v.abs() > 0.1
                || (state.is_automatic() && state.v_setpoint.abs() > 0.1)
                || state.actuators.acceleration().abs() > 0.01;
            if moving {
                VehicleStatus::Running
            } else {
                VehicleStatus::Stopped
            }
        };
        self.state.set_status(status);
    }

    /// Non-blocking drain of fault events for log visibility, from the
    /// bus's default queue. `NavigationControl` reacts to the same
    /// kinds through its own `EventBus::subscribe` copy, so draining
    /// them here never withholds the event it needs.
    fn drain_fault_events_for_observability(&mut self) {
        if self.event_bus.check(EventKind::TemperatureFault).is_some() {
            info!("[CommandLogic] temperature fault event observed");
        }
        if self.event_bus.check(EventKind::ElectricalFault).is_some() {
            info!("[CommandLogic] electrical fault event observed");
        }
        if self.event_bus.check(EventKind::HydraulicFault).is_some() {
            info!("[CommandLogic] hydraulic fault event observed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilteredSample;

    struct NoopSource;
    impl SensorSource for NoopSource {
        fn read(&self) -> crate::model::SensorSample {
            unimplemented!()
        }
        fn clear_faults(&self) {}
    }

    fn task() -> (CommandLogicTask, Arc<SharedState>, Arc<CommandQueue>, Arc<EventBus>, Arc<CircularBuffer>) {
        let buffer = Arc::new(CircularBuffer::new(4).unwrap());
        let state = Arc::new(SharedState::new(1));
        let bus = Arc::new(EventBus::new());
        let commands = Arc::new(CommandQueue::new(4));
        let source = Arc::new(NoopSource);
        let t = CommandLogicTask::new(
            Arc::clone(&buffer),
            Arc::clone(&state),
            Arc::clone(&bus),
            Arc::clone(&commands),
            source,
            Duration::from_millis(10),
        );
        (t, state, commands, bus, buffer)
    }

    #[test]
    fn enable_automatic_zeros_actuators_and_emits_mode_changed() {
        let (mut t, state, commands, bus, _buf) = task();
        commands.try_put(Command::local(CommandKind::EnableAutomatic, 0.0));
        t.tick();
        assert!(state.is_automatic());
        assert_eq!(state.actuators().acceleration(), 0.0);
        assert!(bus.check(EventKind::ModeChanged).is_some());
    }

    #[test]
    fn emergency_stop_dominates_status() {
        // spec.md scenario 3
        let (mut t, state, commands, bus, _buf) = task();
        commands.try_put(Command::local(CommandKind::EnableAutomatic, 0.0));
        t.tick();
        state.set_setpoints(Some(3.0), None);

        commands.try_put(Command::local(CommandKind::EmergencyStop, 0.0));
        t.tick();

        let snap = state.snapshot();
        assert_eq!(snap.status, VehicleStatus::Emergency);
        assert_eq!(snap.actuators.acceleration(), 0.0);
        assert_eq!(snap.actuators.steering(), 0.0);
        assert!(bus.check(EventKind::EmergencyStop).is_some());

        commands.try_put(Command::local(CommandKind::ResetEmergency, 0.0));
        t.tick();
        assert!(!state.snapshot().emergency_stop);
        assert!(bus.check(EventKind::EmergencyReset).is_some());
    }

    #[test]
    fn manual_accelerate_sets_actuators_only_in_manual_mode() {
        let (mut t, state, commands, _bus, _buf) = task();
        commands.try_put(Command::local(CommandKind::Accelerate, 0.0));
        t.tick();
        assert_eq!(state.actuators().acceleration(), 0.5);

        commands.try_put(Command::local(CommandKind::EnableAutomatic, 0.0));
        t.tick();
        commands.try_put(Command::local(CommandKind::Accelerate, 0.0));
        t.tick();
        // automatic mode: manual accelerate is ignored, stays at the
        // value ENABLE_AUTOMATIC zeroed it to.
        assert_eq!(state.actuators().acceleration(), 0.0);
    }

    #[test]
    fn steer_left_preserves_current_acceleration() {
        let (mut t, state, commands, _bus, _buf) = task();
        commands.try_put(Command::local(CommandKind::Accelerate, 0.0));
        t.tick();
        commands.try_put(Command::new(CommandKind::SteerLeft, Some(0.3), "local", 0.0));
        t.tick();
        let a = state.actuators();
        assert_eq!(a.acceleration(), 0.5);
        assert_eq!(a.steering(), 0.3);
    }

    #[test]
    fn turn_left_alias_behaves_like_steer_left() {
        let (mut t, state, commands, _bus, _buf) = task();
        commands.try_put(Command::new(CommandKind::TurnLeft, Some(0.4), "local", 0.0));
        t.tick();
        assert_eq!(state.actuators().steering(), 0.4);
    }

    #[test]
    fn mirrors_latest_sample_pose_and_faults() {
        let (mut t, state, _commands, _bus, buffer) = task();
        buffer.push(FilteredSample {
            x: 1.0,
            y: 2.0,
            theta: 0.3,
            v: 4.0,
            temperature_c: 33.0,
            electrical_fault: true,
            hydraulic_fault: false,
            t: 0.0,
        });
        t.tick();
        let snap = state.snapshot();
        assert_eq!((snap.x, snap.y, snap.theta, snap.v), (1.0, 2.0, 0.3, 4.0));
        assert!(snap.electrical_fault);
        assert_eq!(snap.status, VehicleStatus::Fault);
    }

    #[test]
    fn stopped_when_idle_running_when_moving() {
        let (mut t, state, _commands, _bus, _buf) = task();
        t.tick();
        assert_eq!(state.snapshot().status, VehicleStatus::Stopped);

        state.set_pose(0.0, 0.0, 0.0, 1.0);
        t.tick();
        assert_eq!(state.snapshot().status, VehicleStatus::Running);
    }
}
