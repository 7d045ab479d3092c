//! Construction-time configuration errors.
//!
//! Matches the teacher's own error shape (`SyncManager::start_log_consumer`
//! returns `Result<(), String>`) generalized into a real type instead of a
//! bare `String`, so callers can match on the failure instead of parsing
//! text.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A filter/window order must be at least 1.
    InvalidOrder { what: &'static str, got: i64 },
    /// A PID `sample_time` must be strictly positive.
    InvalidSampleTime { got: f64 },
    /// A ring/queue capacity must be at least 1.
    InvalidCapacity { what: &'static str, got: i64 },
    /// `out_min` must be strictly less than `out_max`.
    InvalidOutputRange { out_min: f64, out_max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidOrder { what, got } => {
                write!(f, "{what}: order must be >= 1, got {got}")
            }
            ConfigError::InvalidSampleTime { got } => {
                write!(f, "sample_time must be > 0, got {got}")
            }
            ConfigError::InvalidCapacity { what, got } => {
                write!(f, "{what}: capacity must be >= 1, got {got}")
            }
            ConfigError::InvalidOutputRange { out_min, out_max } => {
                write!(f, "out_min ({out_min}) must be < out_max ({out_max})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
