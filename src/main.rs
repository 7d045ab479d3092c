//! Embedded CLI driver for the mine haul truck controller (spec.md
//! §6's "CLI surface"): a single positional truck id (default 1) and
//! an optional `--mqtt` flag enabling the pub/sub transport adapter.
//! Exits 0 on clean shutdown, non-zero on initialization failure.
//!
//! Grounded on `original_source/main.py`'s `EmbeddedSystem`/`main()`
//! (construct shared objects, start tasks, run until `SHUTDOWN`, stop),
//! restructured into the teacher's own `main.rs` shape: `env_logger`
//! init first, a `ctrlc`-installed handler flipping a
//! `running: Arc<AtomicBool>` flag the outer loop polls (the same
//! pattern as `evo_hal`'s `main.rs`), and a `SHUTDOWN` command reaching
//! the same exit path from the transport side.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use mine_truck_controller::config::Config;
use mine_truck_controller::controller::{describe_log_entry, Controller};
use mine_truck_controller::external::{ActuatorSink, CsvLogSink, LoopbackBus, PubSub, TransportAdapter};
use mine_truck_controller::model::LogEntry;
use mine_truck_controller::sim::{MineSensorSource, SimActuatorSink};
use mine_truck_controller::tasks::{new_stop_flag, run_periodic};

struct Cli {
    truck_id: u32,
    enable_mqtt: bool,
}

fn parse_cli(args: &[String]) -> Cli {
    let mut truck_id = 1u32;
    let mut enable_mqtt = false;
    for arg in args {
        if arg == "--mqtt" {
            enable_mqtt = true;
        } else if let Ok(id) = arg.parse::<u32>() {
            truck_id = id;
        }
    }
    Cli { truck_id, enable_mqtt }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&args);

    info!("mine truck controller starting for truck {}", cli.truck_id);

    if let Err(e) = run(cli) {
        error!("fatal during initialization: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::for_truck(cli.truck_id);

    let sensor_source = Arc::new(MineSensorSource::new(0.0, 0.0, 0.02));

    let log_path = log_path_for(cli.truck_id);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_sink = Box::new(CsvLogSink::create(&log_path)?);
    info!("telemetry log: {}", log_path.display());

    let controller = Controller::new(&config, Arc::clone(&sensor_source), log_sink)?;

    // Closes the loop for the bundled physics stand-in: polls the
    // actuator commands NavigationControl/CommandLogic write into
    // SharedState and forwards them to the simulated plant (spec.md
    // §6 — "the core drives [the sink] indirectly via SharedState").
    // A real deployment replaces this with a hardware actuator adapter
    // running at whatever rate the bus demands.
    let actuator_sink = SimActuatorSink::new(sensor_source);
    let feedback_stop = new_stop_flag();
    let feedback_handle = {
        let stop = feedback_stop.clone();
        let state = Arc::clone(&controller.shared().state);
        std::thread::spawn(move || {
            run_periodic(&stop, Duration::from_millis(20), || {
                actuator_sink.write(state.actuators());
            });
        })
    };

    let transport = if cli.enable_mqtt {
        let bus: Arc<dyn PubSub> = Arc::new(LoopbackBus::default());
        Some(TransportAdapter::new(bus, cli.truck_id))
    } else {
        None
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(Arc::clone(&running))?;

    info!("controller operational; Ctrl+C to shut down");

    while running.load(Ordering::Acquire) && !controller.shutdown_requested() {
        let snapshot = controller.shared().state.snapshot();
        if let Some(adapter) = &transport {
            adapter.poll_inbound(
                &controller.shared().commands,
                &controller.shared().routes,
                &controller.shared().state,
                now_secs(),
            );
            adapter.publish_state(&snapshot);
            adapter.publish_position(&snapshot);
        }
        info!("{}", describe_log_entry(&status_line(&snapshot, now_secs())));
        std::thread::sleep(Duration::from_secs(1));
    }

    info!("shutting down");
    feedback_stop.store(false, Ordering::Release);
    let _ = feedback_handle.join();
    controller.shutdown();
    info!("controller shutdown complete");
    Ok(())
}

/// Flips `running` to `false` on the first Ctrl+C, letting the outer
/// loop exit into `controller.shutdown()` instead of relying on the
/// process being killed out from under it.
fn install_ctrlc_handler(running: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        info!("Ctrl+C received, shutting down");
        running.store(false, Ordering::Release);
    })
}

fn log_path_for(truck_id: u32) -> PathBuf {
    PathBuf::from("data/logs").join(format!("truck_{truck_id}.csv"))
}

/// Builds the same row shape `DataCollector` writes to CSV, for the
/// outer loop's periodic status line -- not appended anywhere, just
/// logged.
fn status_line(state: &mine_truck_controller::model::VehicleState, t: f64) -> LogEntry {
    LogEntry {
        timestamp: t,
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
        event_description: String::new(),
    }
}

fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
