//! Per-component configuration, grouped the way
//! `original_source/config/settings.py` groups `FILTER_CONFIG`,
//! `TIMING_CONFIG`, `FAULT_CONFIG`, `BUFFER_CONFIG`, `ROUTE_CONFIG` into
//! dictionaries, generalized into plain Rust structs with `Default`
//! impls carrying the spec's numeric defaults — matching the teacher's
//! own style of passing explicit numeric parameters into each
//! component's constructor (`Processor::new`, `Controller::new`)
//! rather than a dynamic config map.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    pub order: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { order: 5 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    pub velocity: PidGains,
    pub angular: PidGains,
    pub max_acceleration: f64,
    pub max_steering: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            velocity: PidGains { kp: 0.5, ki: 0.1, kd: 0.05 },
            angular: PidGains { kp: 1.0, ki: 0.05, kd: 0.2 },
            max_acceleration: 1.0,
            max_steering: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    pub sensor_processing_period: Duration,
    pub fault_monitoring_period: Duration,
    pub command_logic_period: Duration,
    pub navigation_control_period: Duration,
    pub route_planning_period: Duration,
    pub data_collection_period: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sensor_processing_period: Duration::from_millis(100),
            fault_monitoring_period: Duration::from_millis(500),
            command_logic_period: Duration::from_millis(100),
            navigation_control_period: Duration::from_millis(50),
            route_planning_period: Duration::from_millis(500),
            data_collection_period: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaultConfig {
    pub temperature_threshold_c: f64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self { temperature_threshold_c: 100.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BufferConfig {
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteConfig {
    pub waypoint_threshold_m: f64,
    pub min_velocity_mps: f64,
    pub max_velocity_mps: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { waypoint_threshold_m: 1.0, min_velocity_mps: 0.5, max_velocity_mps: 5.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub command_capacity: usize,
    pub route_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { command_capacity: 50, route_capacity: 10 }
    }
}

/// Top-level configuration, constructed once in `main` and handed by
/// reference into `Controller::new` — never mutated after startup.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub truck_id: u32,
    pub filter: FilterConfig,
    pub control: ControlConfig,
    pub timing: TimingConfig,
    pub fault: FaultConfig,
    pub buffer: BufferConfig,
    pub route: RouteConfig,
    pub queue: QueueConfig,
}

impl Config {
    pub fn for_truck(truck_id: u32) -> Self {
        Self {
            truck_id,
            filter: FilterConfig::default(),
            control: ControlConfig::default(),
            timing: TimingConfig::default(),
            fault: FaultConfig::default(),
            buffer: BufferConfig::default(),
            route: RouteConfig::default(),
            queue: QueueConfig::default(),
        }
    }
}
