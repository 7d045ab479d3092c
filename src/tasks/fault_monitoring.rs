//! FaultMonitoring (period 500 ms, spec.md §4.9): edge-triggered fault
//! detection over raw (unfiltered) sensor samples for three conditions
//! — temperature, electrical, hydraulic — each emitting once per
//! transition. Previous-state flags are private to this task.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/fault_monitoring.py`.

use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::external::SensorSource;
use crate::model::{Event, EventKind, Payload, PayloadValue};
use crate::sync::EventBus;

use super::{new_stop_flag, run_periodic, StopFlag};

pub struct FaultMonitoringTask {
    sensor_source: Arc<dyn SensorSource>,
    event_bus: Arc<EventBus>,
    temp_threshold_c: f64,
    period: Duration,
    stop: StopFlag,

    prev_temp_fault: bool,
    prev_electrical_fault: bool,
    prev_hydraulic_fault: bool,
}

impl FaultMonitoringTask {
    pub fn new(
        sensor_source: Arc<dyn SensorSource>,
        event_bus: Arc<EventBus>,
        temp_threshold_c: f64,
        period: Duration,
    ) -> Self {
        Self {
            sensor_source,
            event_bus,
            temp_threshold_c,
            period,
            stop: new_stop_flag(),
            prev_temp_fault: false,
            prev_electrical_fault: false,
            prev_hydraulic_fault: false,
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
        let sample = self.sensor_source.read();
        let t = sample.t;

        let temp_fault = sample.temperature_c > self.temp_threshold_c;
        edge(&mut self.prev_temp_fault, temp_fault, || {
            self.event_bus.emit(Event::new(
                EventKind::TemperatureFault,
                Payload::new().with("temperature", PayloadValue::Number(sample.temperature_c)),
                t,
            ));
            warn!("temperature fault: {:.1}C", sample.temperature_c);
        }, || {
            self.event_bus.emit(Event::new(
                EventKind::FaultCleared,
                Payload::new().with("type", PayloadValue::Text("temperature".into())),
                t,
            ));
        });

        edge(&mut self.prev_electrical_fault, sample.electrical_fault, || {
            self.event_bus.emit(Event::empty(EventKind::ElectricalFault, t));
            warn!("electrical fault");
        }, || {
            self.event_bus.emit(Event::new(
                EventKind::FaultCleared,
                Payload::new().with("type", PayloadValue::Text("electrical".into())),
                t,
            ));
        });

        edge(&mut self.prev_hydraulic_fault, sample.hydraulic_fault, || {
            self.event_bus.emit(Event::empty(EventKind::HydraulicFault, t));
            warn!("hydraulic fault");
        }, || {
            self.event_bus.emit(Event::new(
                EventKind::FaultCleared,
                Payload::new().with("type", PayloadValue::Text("hydraulic".into())),
                t,
            ));
        });
    }
}

/// Emits `on_rise`/`on_fall` only on a transition of `*prev`, then
/// updates `*prev` to `current`.
fn edge(prev: &mut bool, current: bool, on_rise: impl FnOnce(), on_fall: impl FnOnce()) {
    if current && !*prev {
        on_rise();
    } else if !current && *prev {
        on_fall();
    }
    *prev = current;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SensorSample;
    use std::sync::Mutex;

    struct Scripted {
        samples: Mutex<std::vec::IntoIter<SensorSample>>,
    }

    impl SensorSource for Scripted {
        fn read(&self) -> SensorSample {
            self.samples.lock().unwrap().next().unwrap()
        }
        fn clear_faults(&self) {}
    }

    fn sample(temperature_c: f64) -> SensorSample {
        SensorSample {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
            v: 0.0,
            temperature_c,
            electrical_fault: false,
            hydraulic_fault: false,
            t: 0.0,
        }
    }

    #[test]
    fn temperature_edge_fires_once_per_transition() {
        // spec.md scenario 6: threshold 100, sequence [95,98,101,102,99,98]
        let sequence = vec![95.0, 98.0, 101.0, 102.0, 99.0, 98.0];
        let samples: Vec<SensorSample> = sequence.iter().map(|&t| sample(t)).collect();
        let source = Arc::new(Scripted { samples: Mutex::new(samples.into_iter()) });
        let bus = Arc::new(EventBus::new());
        let mut task = FaultMonitoringTask::new(source, Arc::clone(&bus), 100.0, Duration::from_millis(1));

        for _ in 0..6 {
            task.tick();
        }

        let mut fault_count = 0;
        let mut cleared_count = 0;
        while let Some(e) = bus.check(EventKind::TemperatureFault) {
            fault_count += 1;
            let _ = e;
        }
        while let Some(_e) = bus.check(EventKind::FaultCleared) {
            cleared_count += 1;
        }
        assert_eq!(fault_count, 1);
        assert_eq!(cleared_count, 1);
    }

    #[test]
    fn electrical_fault_edge_triggers() {
        let samples = vec![
            SensorSample { electrical_fault: false, ..sample(20.0) },
            SensorSample { electrical_fault: true, ..sample(20.0) },
            SensorSample { electrical_fault: true, ..sample(20.0) },
            SensorSample { electrical_fault: false, ..sample(20.0) },
        ];
        let source = Arc::new(Scripted { samples: Mutex::new(samples.into_iter()) });
        let bus = Arc::new(EventBus::new());
        let mut task = FaultMonitoringTask::new(source, Arc::clone(&bus), 100.0, Duration::from_millis(1));
        for _ in 0..4 {
            task.tick();
        }
        assert!(bus.check(EventKind::ElectricalFault).is_some());
        assert!(bus.check(EventKind::ElectricalFault).is_none());
        assert!(bus.check(EventKind::FaultCleared).is_some());
    }
}
