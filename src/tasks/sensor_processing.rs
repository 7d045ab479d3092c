//! SensorProcessing (period 100 ms, spec.md §4.8): reads a raw
//! `SensorSample`, runs `(x, y, theta, v, temperature)` through five
//! per-channel moving averages, passes fault booleans through
//! unfiltered, stamps the current time, pushes the result onto the
//! `CircularBuffer`.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/sensor_processing.py`
//! (one `MovingAverageFilter` per channel, `circular_buffer.write`).

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::error;

use crate::external::SensorSource;
use crate::filters::MultiChannelFilter;
use crate::model::FilteredSample;
use crate::sync::CircularBuffer;

use super::{new_stop_flag, run_periodic, StopFlag};

pub struct SensorProcessingTask {
    sensor_source: Arc<dyn SensorSource>,
    buffer: Arc<CircularBuffer>,
    filter: MultiChannelFilter,
    period: std::time::Duration,
    stop: StopFlag,
}

impl SensorProcessingTask {
    pub fn new(
        sensor_source: Arc<dyn SensorSource>,
        buffer: Arc<CircularBuffer>,
        filter_order: usize,
        period: std::time::Duration,
    ) -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            sensor_source,
            buffer,
            filter: MultiChannelFilter::new(5, filter_order)?,
            period,
            stop: new_stop_flag(),
        })
    }

    pub fn stop_flag(&self) -> StopFlag {
        Arc::clone(&self.stop)
    }

    /// Runs the periodic loop until `stop_flag()` is cleared. A failure
    /// in any single tick is caught, logged, and does not kill the task
    /// (spec.md §7 — transient I/O errors).
    pub fn run(mut self) {
        let period = self.period;
        let stop = Arc::clone(&self.stop);
        run_periodic(&stop, period, move || {
            if let Err(e) = self.tick() {
                error!("[SensorProcessing] {e}");
            }
        });
    }

    fn tick(&mut self) -> Result<(), String> {
        let raw = self.sensor_source.read();
        let filtered = self
            .filter
            .push(&[raw.x, raw.y, raw.theta, raw.v, raw.temperature_c]);

        let sample = FilteredSample {
            x: filtered[0],
            y: filtered[1],
            theta: filtered[2],
            v: filtered[3],
            temperature_c: filtered[4],
            electrical_fault: raw.electrical_fault,
            hydraulic_fault: raw.hydraulic_fault,
            t: now_secs(),
        };

        self.buffer.push(sample);
        Ok(())
    }
}

fn now_secs() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64()
}
