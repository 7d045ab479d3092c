//! DataCollector (period 1 s, spec.md §4.13): snapshots `SharedState`,
//! builds a `LogEntry` (overridden by the first matching event in
//! priority order), appends it to the `LogSink`, and keeps a bounded
//! in-memory ring of the most recent rows for local UIs.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/data_collector.py`
//! (`log_queue` ring for `get_latest_logs`, CSV append, `_check_events`
//! priority chain).

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::external::{append_or_log, LogSink};
use crate::model::{EventKind, LogEntry, PayloadValue};
use crate::sync::{EventBus, SharedState};

use super::{new_stop_flag, run_periodic, StopFlag};

/// Priority order for overriding the default "Status normal" line
/// (spec.md §4.13): first match wins.
const DESCRIPTION_EVENT_PRIORITY: [EventKind; 4] = [
    EventKind::ModeChanged,
    EventKind::EmergencyStop,
    EventKind::EmergencyReset,
    EventKind::TargetReached,
];

pub struct DataCollectorTask {
    state: Arc<SharedState>,
    event_bus: Arc<EventBus>,
    sink: Box<dyn LogSink>,
    ring: VecDeque<LogEntry>,
    ring_capacity: usize,
    period: Duration,
    stop: StopFlag,
}

impl DataCollectorTask {
    pub fn new(
        state: Arc<SharedState>,
        event_bus: Arc<EventBus>,
        sink: Box<dyn LogSink>,
        ring_capacity: usize,
        period: Duration,
    ) -> Self {
        Self {
            state,
            event_bus,
            sink,
            ring: VecDeque::with_capacity(ring_capacity),
            ring_capacity,
            period,
            stop: new_stop_flag(),
        }
    }

    pub fn stop_flag(&self) -> StopFlag {
        Arc::clone(&self.stop)
    }

    /// Most recent `n` rows collected so far, oldest first, for a local
    /// UI to poll without touching the log file.
    pub fn latest_logs(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.ring.len().saturating_sub(n);
        self.ring.iter().skip(skip).cloned().collect()
    }

    pub fn run(mut self) {
        let period = self.period;
        let stop = Arc::clone(&self.stop);
        run_periodic(&stop, period, move || self.tick());
    }

    fn tick(&mut self) {
        let state = self.state.snapshot();

        let mut entry = LogEntry {
            timestamp: now_secs(),
            truck_id: state.truck_id,
            status: state.status.name().to_string(),
            mode: state.mode.name().to_string(),
            position_x: state.x,
            position_y: state.y,
            theta: state.theta,
            velocity: state.v,
            temperature: state.temperature_c,
            electrical_fault: state.electrical_fault as u8,
            hydraulic_fault: state.hydraulic_fault as u8,
            event_description: "Status normal".to_string(),
        };

        if let Some(description) = self.describe_from_events() {
            entry.event_description = description;
        }

        append_or_log(self.sink.as_mut(), &entry);

        if self.ring.len() == self.ring_capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(entry);
    }

    fn describe_from_events(&mut self) -> Option<String> {
        for &kind in &DESCRIPTION_EVENT_PRIORITY {
            if let Some(event) = self.event_bus.check(kind) {
                return Some(match kind {
                    EventKind::ModeChanged => {
                        let mode = match event.payload.get("mode") {
                            Some(PayloadValue::Text(m)) => m.clone(),
                            _ => "UNKNOWN".to_string(),
                        };
                        format!("Mode changed to {mode}")
                    }
                    EventKind::EmergencyStop => "EMERGENCY STOP".to_string(),
                    EventKind::EmergencyReset => "Emergency reset".to_string(),
                    EventKind::TargetReached => "Target reached".to_string(),
                    _ => unreachable!(),
                });
            }
        }
        None
    }
}

fn now_secs() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::MemoryLogSink;
    use crate::model::{Event, Payload};

    #[test]
    fn default_description_is_status_normal() {
        let state = Arc::new(SharedState::new(1));
        let bus = Arc::new(EventBus::new());
        let mut task = DataCollectorTask::new(state, bus, Box::new(MemoryLogSink::default()), 10, Duration::from_millis(10));
        task.tick();
        assert_eq!(task.latest_logs(1)[0].event_description, "Status normal");
    }

    #[test]
    fn mode_changed_takes_priority_over_target_reached() {
        let state = Arc::new(SharedState::new(1));
        let bus = Arc::new(EventBus::new());
        bus.emit(Event::empty(EventKind::TargetReached, 0.0));
        bus.emit(Event::new(
            EventKind::ModeChanged,
            Payload::new().with("mode", PayloadValue::Text("AUTOMATIC".into())),
            0.0,
        ));
        let mut task = DataCollectorTask::new(state, bus, Box::new(MemoryLogSink::default()), 10, Duration::from_millis(10));
        task.tick();
        assert_eq!(task.latest_logs(1)[0].event_description, "Mode changed to AUTOMATIC");
    }

    #[test]
    fn ring_evicts_oldest_on_overflow() {
        let state = Arc::new(SharedState::new(1));
        let bus = Arc::new(EventBus::new());
        let mut task = DataCollectorTask::new(state, bus, Box::new(MemoryLogSink::default()), 2, Duration::from_millis(10));
        for _ in 0..5 {
            task.tick();
        }
        assert_eq!(task.latest_logs(10).len(), 2);
    }
}
