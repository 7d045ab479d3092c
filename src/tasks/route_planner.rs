//! RoutePlanner (period 500 ms, spec.md §4.12): drains the `RouteQueue`
//! for new waypoint lists, advances a cursor as the truck reaches each
//! waypoint, and writes `(theta_setpoint, v_setpoint, target)` into
//! `SharedState` while chasing the current one.
//!
//! Grounded on
//! `examples/original_source/src/embedded/tasks/route_planner.py`.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::model::{Event, EventKind, Payload, PayloadValue};
use crate::sync::{EventBus, RouteQueue, SharedState};

use super::{new_stop_flag, run_periodic, StopFlag};

pub struct RoutePlannerTask {
    state: Arc<SharedState>,
    event_bus: Arc<EventBus>,
    routes: Arc<RouteQueue>,
    waypoint_threshold_m: f64,
    min_velocity_mps: f64,
    max_velocity_mps: f64,
    period: Duration,
    stop: StopFlag,

    route: Vec<(f64, f64)>,
    cursor: usize,
}

impl RoutePlannerTask {
    pub fn new(
        state: Arc<SharedState>,
        event_bus: Arc<EventBus>,
        routes: Arc<RouteQueue>,
        waypoint_threshold_m: f64,
        min_velocity_mps: f64,
        max_velocity_mps: f64,
        period: Duration,
    ) -> Self {
        Self {
            state,
            event_bus,
            routes,
            waypoint_threshold_m,
            min_velocity_mps,
            max_velocity_mps,
            period,
            stop: new_stop_flag(),
            route: Vec::new(),
            cursor: 0,
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
        self.check_new_route();

        if self.route.is_empty() || !self.state.is_automatic() {
            return;
        }

        self.update_setpoints();
    }

    fn check_new_route(&mut self) {
        if let Some(route) = self.routes.try_get() {
            let len = route.len();
            self.route = route;
            self.cursor = 0;
            info!("[RoutePlanner] new route received with {len} waypoints");
            self.event_bus.emit(Event::new(
                EventKind::NewRoute,
                Payload::new().with("n", PayloadValue::Number(len as f64)),
                0.0,
            ));
        }
    }

    fn update_setpoints(&mut self) {
        let (x, y, _theta, _v) = self.state.pose();

        if self.cursor >= self.route.len() {
            self.finish_route();
            return;
        }

        let (mut tx, mut ty) = self.route[self.cursor];
        let mut distance = hypot(tx - x, ty - y);

        if distance < self.waypoint_threshold_m {
            info!(
                "[RoutePlanner] waypoint {}/{} reached",
                self.cursor + 1,
                self.route.len()
            );
            self.cursor += 1;
            if self.cursor >= self.route.len() {
                self.finish_route();
                return;
            }
            (tx, ty) = self.route[self.cursor];
            distance = hypot(tx - x, ty - y);
        }

        let theta_sp = (ty - y).atan2(tx - x);
        let v_sp = (distance * 0.5).clamp(self.min_velocity_mps, self.max_velocity_mps);

        self.state.set_setpoints(Some(v_sp), Some(theta_sp));
        self.state.set_target(Some((tx, ty)));
    }

    fn finish_route(&mut self) {
        self.state.set_setpoints(Some(0.0), None);
        self.event_bus.emit(Event::empty(EventKind::TargetReached, 0.0));
        self.route.clear();
        self.cursor = 0;
    }
}

fn hypot(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}
