//! Abstract publish/subscribe transport (spec.md §6, §1 non-goal: "the
//! core is defined against an abstract publish/subscribe transport").
//!
//! `LoopbackBus` is the default/testable implementation — in-process,
//! `crossbeam_channel`-backed, mirroring the teacher's own bounded
//! channel wiring in `main.rs`'s sensor → processor → actuator pipeline
//! rather than pulling in a broker client the example pack never uses.
//! `TransportAdapter` bridges the four JSON topics from spec.md §6 onto
//! the core's queues; it only runs when `--mqtt` is passed, matching
//! the CLI surface.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Command, CommandKind, VehicleState};
use crate::sync::{CommandQueue, RouteQueue, SharedState};

pub trait PubSub: Send + Sync {
    fn publish(&self, topic: &str, payload: &str);
    /// Non-blocking poll for the next message on `topic`, if any.
    fn poll(&self, topic: &str) -> Option<String>;
}

/// In-process, channel-backed bus. One bounded channel per topic string,
/// created lazily on first publish/subscribe.
pub struct LoopbackBus {
    topics: parking_lot::Mutex<std::collections::HashMap<String, (Sender<String>, Receiver<String>)>>,
    capacity: usize,
}

impl LoopbackBus {
    pub fn new(capacity: usize) -> Self {
        Self { topics: parking_lot::Mutex::new(std::collections::HashMap::new()), capacity: capacity.max(1) }
    }

    fn channel_for(&self, topic: &str) -> (Sender<String>, Receiver<String>) {
        let mut topics = self.topics.lock();
        topics
            .entry(topic.to_string())
            .or_insert_with(|| channel::bounded(self.capacity))
            .clone()
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl PubSub for LoopbackBus {
    fn publish(&self, topic: &str, payload: &str) {
        let (tx, _) = self.channel_for(topic);
        if tx.try_send(payload.to_string()).is_err() {
            warn!("loopback bus topic {topic} full, dropping message");
        }
    }

    fn poll(&self, topic: &str) -> Option<String> {
        let (_, rx) = self.channel_for(topic);
        rx.try_recv().ok()
    }
}

#[derive(Debug, Deserialize)]
struct WireCommand {
    #[serde(rename = "type")]
    kind: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    waypoints: Vec<Value>,
}

/// `mine/truck/{id}/setpoint` payload (spec.md §6): a direct remote
/// override of the velocity/heading setpoints, bypassing `RoutePlanner`
/// -- the central station steering the truck by setpoint rather than by
/// waypoint list.
#[derive(Debug, Deserialize)]
struct WireSetpoint {
    velocity: f64,
    angular: f64,
}

#[derive(Debug, Serialize)]
struct WireState {
    truck_id: u32,
    status: String,
    mode: String,
    x: f64,
    y: f64,
    theta: f64,
    v: f64,
    v_setpoint: f64,
    theta_setpoint: f64,
    acceleration: f64,
    steering: f64,
    electrical_fault: bool,
    hydraulic_fault: bool,
    emergency_stop: bool,
}

#[derive(Debug, Serialize)]
struct WirePosition {
    x: f64,
    y: f64,
    theta: f64,
}

/// Bridges the four topic templates from spec.md §6 onto the core's
/// `CommandQueue`/`RouteQueue` (inbound) and publishes `state`/`position`
/// (outbound), at roughly 1 Hz for `state`.
pub struct TransportAdapter {
    bus: Arc<dyn PubSub>,
    command_topic: String,
    setpoint_topic: String,
    route_topic: String,
    state_topic: String,
    position_topic: String,
}

impl TransportAdapter {
    pub fn new(bus: Arc<dyn PubSub>, truck_id: u32) -> Self {
        Self {
            bus,
            command_topic: format!("mine/truck/{truck_id}/command"),
            setpoint_topic: format!("mine/truck/{truck_id}/setpoint"),
            route_topic: format!("mine/truck/{truck_id}/route"),
            state_topic: format!("mine/truck/{truck_id}/state"),
            position_topic: format!("mine/truck/{truck_id}/position"),
        }
    }

    /// Drains inbound `command`, `setpoint` and `route` topics into the
    /// core's queues/shared state. Malformed JSON is logged and dropped
    /// (spec.md §7 protocol errors), never a fatal error.
    pub fn poll_inbound(
        &self,
        commands: &CommandQueue,
        routes: &RouteQueue,
        state: &SharedState,
        t: f64,
    ) {
        while let Some(raw) = self.bus.poll(&self.command_topic) {
            match serde_json::from_str::<WireCommand>(&raw) {
                Ok(wire) => match CommandKind::from_wire_name(&wire.kind) {
                    Some(kind) => commands.try_put(Command::new(kind, wire.value, "remote", t)),
                    None => warn!("unknown command type on transport: {}", wire.kind),
                },
                Err(e) => warn!("malformed command JSON dropped: {e}"),
            }
        }

        while let Some(raw) = self.bus.poll(&self.setpoint_topic) {
            match serde_json::from_str::<WireSetpoint>(&raw) {
                Ok(wire) => state.set_setpoints(Some(wire.velocity), Some(wire.angular)),
                Err(e) => warn!("malformed setpoint JSON dropped: {e}"),
            }
        }

        while let Some(raw) = self.bus.poll(&self.route_topic) {
            match serde_json::from_str::<WireRoute>(&raw) {
                Ok(wire) => match parse_waypoints(&wire.waypoints) {
                    Some(points) => routes.try_put(points),
                    None => warn!("malformed waypoint entry dropped"),
                },
                Err(e) => warn!("malformed route JSON dropped: {e}"),
            }
        }
    }

    pub fn publish_state(&self, state: &VehicleState) {
        let wire = WireState {
            truck_id: state.truck_id,
            status: state.status.name().to_string(),
            mode: state.mode.name().to_string(),
            x: state.x,
            y: state.y,
            theta: state.theta,
            v: state.v,
            v_setpoint: state.v_setpoint,
            theta_setpoint: state.theta_setpoint,
            acceleration: state.actuators.acceleration(),
            steering: state.actuators.steering(),
            electrical_fault: state.electrical_fault,
            hydraulic_fault: state.hydraulic_fault,
            emergency_stop: state.emergency_stop,
        };
        match serde_json::to_string(&wire) {
            Ok(payload) => self.bus.publish(&self.state_topic, &payload),
            Err(e) => warn!("failed to serialize state: {e}"),
        }
    }

    pub fn publish_position(&self, state: &VehicleState) {
        let wire = WirePosition { x: state.x, y: state.y, theta: state.theta };
        match serde_json::to_string(&wire) {
            Ok(payload) => {
                debug!("publishing position on {}", self.position_topic);
                self.bus.publish(&self.position_topic, &payload)
            }
            Err(e) => warn!("failed to serialize position: {e}"),
        }
    }

    pub const STATE_PERIOD: Duration = Duration::from_secs(1);
}

/// Accepts either `[[x,y], ...]` or `[{"x":..,"y":..}, ...]` per spec.md §6.
fn parse_waypoints(raw: &[Value]) -> Option<Vec<(f64, f64)>> {
    let mut out = Vec::with_capacity(raw.len());
    for v in raw {
        let point = if let Some(arr) = v.as_array() {
            if arr.len() != 2 {
                return None;
            }
            (arr[0].as_f64()?, arr[1].as_f64()?)
        } else if v.is_object() {
            (v.get("x")?.as_f64()?, v.get("y")?.as_f64()?)
        } else {
            return None;
        };
        out.push(point);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandKind;

    #[test]
    fn loopback_publish_then_poll_round_trips() {
        let bus = LoopbackBus::new(8);
        bus.publish("mine/truck/1/state", "hello");
        assert_eq!(bus.poll("mine/truck/1/state"), Some("hello".to_string()));
        assert_eq!(bus.poll("mine/truck/1/state"), None);
    }

    #[test]
    fn adapter_parses_commands_and_drops_malformed() {
        let bus: Arc<dyn PubSub> = Arc::new(LoopbackBus::new(8));
        let adapter = TransportAdapter::new(Arc::clone(&bus), 1);
        bus.publish("mine/truck/1/command", r#"{"type":"STOP"}"#);
        bus.publish("mine/truck/1/command", "not json");
        let commands = CommandQueue::with_default_capacity();
        let routes = RouteQueue::with_default_capacity();
        let state = SharedState::new(1);
        adapter.poll_inbound(&commands, &routes, &state, 0.0);
        let got = commands.try_get().unwrap();
        assert_eq!(got.kind, CommandKind::Stop);
        assert!(commands.try_get().is_none());
    }

    #[test]
    fn adapter_parses_both_waypoint_shapes() {
        let bus: Arc<dyn PubSub> = Arc::new(LoopbackBus::new(8));
        let adapter = TransportAdapter::new(Arc::clone(&bus), 2);
        bus.publish("mine/truck/2/route", r#"{"waypoints":[[1,2],{"x":3,"y":4}]}"#);
        let commands = CommandQueue::with_default_capacity();
        let routes = RouteQueue::with_default_capacity();
        let state = SharedState::new(2);
        adapter.poll_inbound(&commands, &routes, &state, 0.0);
        let got = routes.try_get().unwrap();
        assert_eq!(got, vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn adapter_applies_inbound_setpoint_directly_to_shared_state() {
        let bus: Arc<dyn PubSub> = Arc::new(LoopbackBus::new(8));
        let adapter = TransportAdapter::new(Arc::clone(&bus), 3);
        bus.publish("mine/truck/3/setpoint", r#"{"velocity":2.5,"angular":0.4}"#);
        let commands = CommandQueue::with_default_capacity();
        let routes = RouteQueue::with_default_capacity();
        let state = SharedState::new(3);
        adapter.poll_inbound(&commands, &routes, &state, 0.0);
        assert_eq!(state.setpoints(), (2.5, 0.4));
    }
}
