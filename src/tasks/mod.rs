//! The periodic task set: sensor processing, fault monitoring, command
//! logic, navigation control, route planning, data collection — one OS
//! thread each, wired together by `crate::controller::Controller`.
//!
//! Each task owns a cooperative `Arc<AtomicBool>` stop flag exactly like
//! the teacher's `Sensor`/cpu-load threads (`running: Arc<AtomicBool>`),
//! and runs the period-sample/work/sleep loop spec.md §5 prescribes via
//! `run_periodic`, paced with the teacher's own `spin_sleep` crate.

mod command_logic;
mod data_collector;
mod fault_monitoring;
mod navigation_control;
mod route_planner;
mod sensor_processing;

pub use command_logic::CommandLogicTask;
pub use data_collector::DataCollectorTask;
pub use fault_monitoring::FaultMonitoringTask;
pub use navigation_control::NavigationControlTask;
pub use route_planner::RoutePlannerTask;
pub use sensor_processing::SensorProcessingTask;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use spin_sleep::SpinSleeper;

/// Cooperative shutdown flag shared between a task's thread and the
/// controller; `Acquire`/`Release` ordering matches the teacher's own
/// `running: Arc<AtomicBool>` usage throughout `component_a`/`component_b`.
pub type StopFlag = Arc<AtomicBool>;

pub fn new_stop_flag() -> StopFlag {
    Arc::new(AtomicBool::new(true))
}

/// Samples monotonic time at the top of each iteration, invokes `tick`,
/// then sleeps `max(0, period - elapsed)` — spec.md §5's scheduling
/// model. Exits as soon as `stop` is cleared; no iteration is started
/// after that point. Never holds a lock across the sleep (spec.md §5
/// "suspension points").
pub fn run_periodic(stop: &StopFlag, period: Duration, mut tick: impl FnMut()) {
    let sleeper = SpinSleeper::new(100_000);
    while stop.load(Ordering::Acquire) {
        let start = Instant::now();
        tick();
        let elapsed = start.elapsed();
        if elapsed < period {
            sleeper.sleep(period - elapsed);
        }
    }
}
