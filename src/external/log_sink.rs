//! Telemetry sink: an abstract `LogSink` trait (spec.md §1 non-goal —
//! "file-system log sink internals beyond a `LogSink` trait") plus one
//! concrete CSV writer.
//!
//! Grounded on the teacher's own `csv::Writer` usage in
//! `component_a/sync_manager.rs`'s log consumer thread and
//! `utils/metrics.rs`'s `EventRecorder::start_exporter`: open the file
//! once, wrap in a single `csv::Writer`, flush after each row, single
//! writer discipline (only `DataCollector` ever calls `append`).

use std::fs::File;
use std::io;
use std::path::Path;

use log::error;

use crate::model::LogEntry;

pub trait LogSink: Send + Sync {
    /// Appends one row. Failures are the caller's responsibility to log
    /// and count (spec.md §7 — transient I/O, not fatal).
    fn append(&mut self, entry: &LogEntry) -> io::Result<()>;
}

/// CSV file sink with the fixed schema from spec.md §6.
pub struct CsvLogSink {
    writer: csv::Writer<File>,
}

impl CsvLogSink {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(LogEntry::csv_header().split(','))?;
        writer.flush()?;
        Ok(Self { writer })
    }
}

impl LogSink for CsvLogSink {
    fn append(&mut self, entry: &LogEntry) -> io::Result<()> {
        self.writer
            .serialize(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.writer.flush()
    }
}

/// In-memory sink for tests — never touches the filesystem.
#[derive(Default)]
pub struct MemoryLogSink {
    pub rows: Vec<LogEntry>,
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, entry: &LogEntry) -> io::Result<()> {
        self.rows.push(entry.clone());
        Ok(())
    }
}

/// Logs and swallows the error, the log-append handling spec.md §7
/// prescribes (transient I/O, counted, not fatal).
pub fn append_or_log(sink: &mut dyn LogSink, entry: &LogEntry) {
    if let Err(e) = sink.append(entry) {
        error!("log sink append failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogEntry;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: 0.0,
            truck_id: 1,
            status: "STOPPED".into(),
            mode: "MANUAL_LOCAL".into(),
            position_x: 0.0,
            position_y: 0.0,
            theta: 0.0,
            velocity: 0.0,
            temperature: 20.0,
            electrical_fault: 0,
            hydraulic_fault: 0,
            event_description: "Status normal".into(),
        }
    }

    #[test]
    fn memory_sink_collects_rows() {
        let mut sink = MemoryLogSink::default();
        append_or_log(&mut sink, &sample_entry());
        assert_eq!(sink.rows.len(), 1);
    }
}
