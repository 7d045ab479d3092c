//! Seams to the outside world: sensor/actuator hardware, the telemetry
//! sink, and the pub/sub transport. The core only ever depends on the
//! traits here, never on a concrete implementation — the concrete
//! instances used by the binary live in `crate::sim` and below.

mod actuator_sink;
mod log_sink;
mod sensor_source;
mod transport;

pub use actuator_sink::ActuatorSink;
pub use log_sink::{append_or_log, CsvLogSink, LogSink, MemoryLogSink};
pub use sensor_source::SensorSource;
pub use transport::{LoopbackBus, PubSub, TransportAdapter};
