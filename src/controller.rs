//! Wires the six periodic tasks against the three shared objects and
//! the two bounded queues, and owns their start/stop lifecycle.
//!
//! Grounded on `original_source/main.py`'s `EmbeddedSystem`
//! (construct-all-shared-objects-first, start tasks in a fixed order,
//! stop in reverse, bounded join), restructured into the teacher's own
//! `thread::spawn`-per-worker fleet from `main.rs`'s
//! `run_simulation_internal` (sensors/processor/receiver threads, a
//! `running: Arc<AtomicBool>` per worker, join-all-on-shutdown).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::info;

use crate::config::Config;
use crate::control::{AngularController, VelocityController};
use crate::error::ConfigError;
use crate::external::{LogSink, SensorSource};
use crate::model::{Command, Event, EventKind, LogEntry};
use crate::sync::{CircularBuffer, CommandQueue, EventBus, RouteQueue, SharedState};
use crate::tasks::{
    CommandLogicTask, DataCollectorTask, FaultMonitoringTask, NavigationControlTask,
    RoutePlannerTask, SensorProcessingTask, StopFlag,
};

/// Bounded total join budget on shutdown (spec.md §5 — "approx 2s").
const SHUTDOWN_JOIN_BUDGET: Duration = Duration::from_secs(2);

/// The shared objects every task reads or writes, created once before
/// any task starts (spec.md §3 "Lifecycle").
pub struct SharedObjects {
    pub state: Arc<SharedState>,
    pub buffer: Arc<CircularBuffer>,
    pub event_bus: Arc<EventBus>,
    pub commands: Arc<CommandQueue>,
    pub routes: Arc<RouteQueue>,
}

impl SharedObjects {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            state: Arc::new(SharedState::new(config.truck_id)),
            buffer: Arc::new(CircularBuffer::new(config.buffer.capacity)?),
            event_bus: Arc::new(EventBus::new()),
            commands: Arc::new(CommandQueue::new(config.queue.command_capacity)),
            routes: Arc::new(RouteQueue::new(config.queue.route_capacity)),
        })
    }
}

struct Worker {
    name: &'static str,
    stop: StopFlag,
    handle: JoinHandle<()>,
}

/// Owns the six periodic task threads. Created, started and stopped in
/// the order spec.md §3 fixes: sensor -> fault -> command -> nav ->
/// planner -> collector, reverse on shutdown.
pub struct Controller {
    shared: SharedObjects,
    sensor_source: Arc<dyn SensorSource>,
    workers: Vec<Worker>,
}

impl Controller {
    pub fn new(
        config: &Config,
        sensor_source: Arc<dyn SensorSource>,
        log_sink: Box<dyn LogSink>,
    ) -> Result<Self, ConfigError> {
        let shared = SharedObjects::new(config)?;

        let sensor_task = SensorProcessingTask::new(
            Arc::clone(&sensor_source),
            Arc::clone(&shared.buffer),
            config.filter.order,
            config.timing.sensor_processing_period,
        )?;
        let sensor_stop = sensor_task.stop_flag();

        let fault_task = FaultMonitoringTask::new(
            Arc::clone(&sensor_source),
            Arc::clone(&shared.event_bus),
            config.fault.temperature_threshold_c,
            config.timing.fault_monitoring_period,
        );
        let fault_stop = fault_task.stop_flag();

        let command_task = CommandLogicTask::new(
            Arc::clone(&shared.buffer),
            Arc::clone(&shared.state),
            Arc::clone(&shared.event_bus),
            Arc::clone(&shared.commands),
            Arc::clone(&sensor_source),
            config.timing.command_logic_period,
        );
        let command_stop = command_task.stop_flag();

        let velocity = VelocityController::new(
            config.control.velocity.kp,
            config.control.velocity.ki,
            config.control.velocity.kd,
            config.control.max_acceleration,
        )?;
        let angular = AngularController::new(
            config.control.angular.kp,
            config.control.angular.ki,
            config.control.angular.kd,
            config.control.max_steering,
        )?;
        let nav_task = NavigationControlTask::new(
            Arc::clone(&shared.state),
            &shared.event_bus,
            velocity,
            angular,
            config.timing.navigation_control_period,
        );
        let nav_stop = nav_task.stop_flag();

        let planner_task = RoutePlannerTask::new(
            Arc::clone(&shared.state),
            Arc::clone(&shared.event_bus),
            Arc::clone(&shared.routes),
            config.route.waypoint_threshold_m,
            config.route.min_velocity_mps,
            config.route.max_velocity_mps,
            config.timing.route_planning_period,
        );
        let planner_stop = planner_task.stop_flag();

        let collector_task = DataCollectorTask::new(
            Arc::clone(&shared.state),
            Arc::clone(&shared.event_bus),
            log_sink,
            256,
            config.timing.data_collection_period,
        );
        let collector_stop = collector_task.stop_flag();

        let workers = vec![
            Worker { name: "SensorProcessing", stop: sensor_stop, handle: std::thread::spawn(move || sensor_task.run()) },
            Worker { name: "FaultMonitoring", stop: fault_stop, handle: std::thread::spawn(move || fault_task.run()) },
            Worker { name: "CommandLogic", stop: command_stop, handle: std::thread::spawn(move || command_task.run()) },
            Worker { name: "NavigationControl", stop: nav_stop, handle: std::thread::spawn(move || nav_task.run()) },
            Worker { name: "RoutePlanner", stop: planner_stop, handle: std::thread::spawn(move || planner_task.run()) },
            Worker { name: "DataCollector", stop: collector_stop, handle: std::thread::spawn(move || collector_task.run()) },
        ];

        info!("controller started {} tasks for truck {}", workers.len(), config.truck_id);

        Ok(Self { shared, sensor_source, workers })
    }

    pub fn shared(&self) -> &SharedObjects {
        &self.shared
    }

    pub fn sensor_source(&self) -> &Arc<dyn SensorSource> {
        &self.sensor_source
    }

    pub fn submit_command(&self, command: Command) {
        self.shared.commands.try_put(command);
    }

    pub fn submit_route(&self, waypoints: Vec<(f64, f64)>) {
        self.shared.routes.try_put(waypoints);
    }

    /// Whether the `SHUTDOWN` event has been observed (non-blocking) --
    /// the controller's outer loop polls this to decide when to tear
    /// down.
    pub fn shutdown_requested(&self) -> bool {
        self.shared.event_bus.check(EventKind::Shutdown).is_some()
    }

    /// Sets every task's stop flag, emits `SHUTDOWN`, signals the event
    /// bus (so any blocked `wait_any` wakes with no event), then joins
    /// every task thread in reverse start order within an overall
    /// `SHUTDOWN_JOIN_BUDGET`. No forced termination (spec.md §5).
    pub fn shutdown(mut self) {
        for worker in &self.workers {
            worker.stop.store(false, Ordering::Release);
        }
        self.shared.event_bus.emit(Event::empty(EventKind::Shutdown, 0.0));
        self.shared.event_bus.shutdown();

        let deadline = std::time::Instant::now() + SHUTDOWN_JOIN_BUDGET;
        for worker in self.workers.drain(..).rev() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            info!("joining {} (budget {:?} remaining)", worker.name, remaining);
            let _ = worker.handle.join();
        }
        info!("controller shutdown complete");
    }
}

/// Appends the most recent telemetry row's description for
/// observability purposes (used by the embedded CLI driver's status
/// print). Not part of the core task set.
pub fn describe_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{:.0}] truck {} status={} mode={} pos=({:.2},{:.2}) v={:.2} t={:.1}C - {}",
        entry.timestamp,
        entry.truck_id,
        entry.status,
        entry.mode,
        entry.position_x,
        entry.position_y,
        entry.velocity,
        entry.temperature,
        entry.event_description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommandKind, OperationMode, SensorSample};
    use std::sync::atomic::AtomicBool;

    struct StubSource {
        fault_cleared: AtomicBool,
    }

    impl SensorSource for StubSource {
        fn read(&self) -> SensorSample {
            SensorSample {
                x: 0.0,
                y: 0.0,
                theta: 0.0,
                v: 0.0,
                temperature_c: 20.0,
                electrical_fault: false,
                hydraulic_fault: false,
                t: 0.0,
            }
        }
        fn clear_faults(&self) {
            self.fault_cleared.store(true, Ordering::Release);
        }
    }

    #[test]
    fn starts_all_six_tasks_and_shuts_down_within_budget() {
        let config = Config::for_truck(1);
        let source = Arc::new(StubSource { fault_cleared: AtomicBool::new(false) });
        let controller =
            Controller::new(&config, source, Box::new(crate::external::MemoryLogSink::default())).unwrap();
        assert_eq!(controller.workers.len(), 6);

        controller.submit_command(Command::local(CommandKind::EnableAutomatic, 0.0));
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(controller.shared().state.snapshot().mode, OperationMode::AutomaticRemote);

        let start = std::time::Instant::now();
        controller.shutdown();
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
