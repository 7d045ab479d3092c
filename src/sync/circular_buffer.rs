//! Bounded ring of `FilteredSample`, overwrite-oldest on overflow.
//!
//! Grounded on
//! `examples/original_source/src/embedded/sync/circular_buffer.py`
//! (`deque(maxlen=size)` under one lock), using `parking_lot::Mutex` the
//! way the teacher's `SyncManager` guards its own `Diagnostics` —
//! a single mutex protecting a plain `VecDeque`, no lock held across
//! a sleep or a downstream call.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::model::FilteredSample;

pub struct CircularBuffer {
    inner: Mutex<VecDeque<FilteredSample>>,
    capacity: usize,
}

impl CircularBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity { what: "CircularBuffer", got: 0 });
        }
        Ok(Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Overwrites the oldest entry once the ring is full.
    pub fn push(&self, sample: FilteredSample) {
        let mut buf = self.inner.lock();
        if buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(sample);
    }

    pub fn latest(&self) -> Option<FilteredSample> {
        self.inner.lock().back().copied()
    }

    /// Most recent `n` samples, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<FilteredSample> {
        let buf = self.inner.lock();
        let len = buf.len();
        let skip = len.saturating_sub(n);
        buf.iter().skip(skip).copied().collect()
    }

    pub fn snapshot_all(&self) -> Vec<FilteredSample> {
        self.inner.lock().iter().copied().collect()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> FilteredSample {
        FilteredSample {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
            v: 0.0,
            temperature_c: 0.0,
            electrical_fault: false,
            hydraulic_fault: false,
            t,
        }
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(CircularBuffer::new(0).is_err());
    }

    #[test]
    fn overwrites_oldest_on_overflow() {
        let buf = CircularBuffer::new(3).unwrap();
        for i in 0..5 {
            buf.push(sample(i as f64));
        }
        assert_eq!(buf.size(), 3);
        let all: Vec<f64> = buf.snapshot_all().iter().map(|s| s.t).collect();
        assert_eq!(all, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn latest_and_last_n_preserve_fifo_order() {
        let buf = CircularBuffer::new(5).unwrap();
        for i in 0..4 {
            buf.push(sample(i as f64));
        }
        assert_eq!(buf.latest().unwrap().t, 3.0);
        let last2: Vec<f64> = buf.last_n(2).iter().map(|s| s.t).collect();
        assert_eq!(last2, vec![2.0, 3.0]);
    }

    #[test]
    fn clear_empties_buffer() {
        let buf = CircularBuffer::new(2).unwrap();
        buf.push(sample(1.0));
        buf.clear();
        assert_eq!(buf.size(), 0);
        assert!(buf.latest().is_none());
    }
}
