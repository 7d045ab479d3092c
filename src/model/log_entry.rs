//! Append-only telemetry row written by `DataCollector`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Seconds since epoch, millisecond precision.
    pub timestamp: f64,
    pub truck_id: u32,
    pub status: String,
    pub mode: String,
    pub position_x: f64,
    pub position_y: f64,
    pub theta: f64,
    pub velocity: f64,
    pub temperature: f64,
    pub electrical_fault: u8,
    pub hydraulic_fault: u8,
    pub event_description: String,
}

impl LogEntry {
    pub fn csv_header() -> &'static str {
        "timestamp,truck_id,status,mode,position_x,position_y,theta,velocity,temperature,electrical_fault,hydraulic_fault,event_description"
    }
}
