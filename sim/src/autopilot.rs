//! Pilots: something that turns flight state + route into stick input.

use flight::{ControlInput, FlightState, NavigationInput, Vec3f, WaypointKind, WaypointNavigator};
use serde::{Deserialize, Serialize};

pub trait Controller: Send + Sync {
    fn control(&mut self, state: &FlightState, navigator: &WaypointNavigator, dt: f32) -> ControlInput;

    fn reset(&mut self) {}

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotMode {
    #[default]
    Autopilot,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub mode: PilotMode,
    /// Throttle per metre of altitude error.
    pub altitude_gain: f32,
    /// Throttle per m/s of vertical speed.
    pub vertical_damping: f32,
    /// Horizontal flight waits until altitude is within this many metres.
    pub climb_first_band: f32,
    /// Stick per m/s used to cancel unwanted horizontal drift.
    pub brake_gain: f32,
    /// Fixed input replayed in manual mode.
    pub manual_input: ControlInput,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            mode: PilotMode::Autopilot,
            altitude_gain: 0.2,
            vertical_damping: 0.5,
            climb_first_band: 8.0,
            brake_gain: 0.3,
            manual_input: ControlInput::NEUTRAL,
        }
    }
}

pub fn pilot_for(cfg: &PilotConfig) -> Box<dyn Controller> {
    match cfg.mode {
        PilotMode::Autopilot => Box::new(Autopilot::new(cfg.clone())),
        PilotMode::Manual => Box::new(ManualPilot { input: cfg.manual_input }),
    }
}

/// Altitude-first route follower.
///
/// Holds the height of the waypoint being flown with a PD loop (the
/// navigator's cruise altitude only for the takeoff point), lets the
/// navigator steer once the altitude error is inside the band, and damps
/// sideways drift throughout. When the route ends it settles on the last
/// waypoint.
#[derive(Debug, Clone)]
pub struct Autopilot {
    cfg: PilotConfig,
    hold: Option<Vec3f>,
}

impl Autopilot {
    pub fn new(cfg: PilotConfig) -> Self {
        Self { cfg, hold: None }
    }

    // Body-frame stick that opposes the current horizontal velocity.
    fn brake(&self, state: &FlightState) -> (f32, f32) {
        let (s, c) = state.heading.sin_cos();
        let v = state.velocity;
        let forward = v.x * s + v.z * c;
        let right = v.x * c - v.z * s;
        let k = self.cfg.brake_gain;
        ((-forward * k).clamp(-1.0, 1.0), (-right * k).clamp(-1.0, 1.0))
    }
}

impl Controller for Autopilot {
    fn control(&mut self, state: &FlightState, navigator: &WaypointNavigator, _dt: f32) -> ControlInput {
        let (steering, leg_altitude) = match navigator.current_waypoint() {
            Some(wp) if navigator.is_navigating() => {
                self.hold = Some(wp.position);
                let altitude = match wp.kind {
                    WaypointKind::Start => navigator.get_target_altitude(),
                    _ => wp.position.y,
                };
                (Some(navigator.get_navigation_input(state.position, state.heading)), Some(altitude))
            }
            _ => (None, None),
        };
        let target_altitude = leg_altitude
            .or(self.hold.map(|hold| hold.y))
            .unwrap_or(state.position.y);

        let error = target_altitude - state.position.y;
        let throttle = (self.cfg.altitude_gain * error - self.cfg.vertical_damping * state.velocity.y)
            .clamp(-1.0, 1.0);

        let (brake_pitch, brake_roll) = self.brake(state);
        let NavigationInput { pitch, yaw, .. } = steering.unwrap_or_default();
        let cruising = steering.is_some() && error.abs() <= self.cfg.climb_first_band && pitch > 0.0;

        ControlInput {
            throttle,
            yaw,
            pitch: if cruising { pitch } else { brake_pitch },
            roll: brake_roll,
        }
    }

    fn reset(&mut self) {
        self.hold = None;
    }

    fn name(&self) -> &'static str {
        "autopilot"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ManualPilot {
    pub input: ControlInput,
}

impl Controller for ManualPilot {
    fn control(&mut self, _state: &FlightState, _navigator: &WaypointNavigator, _dt: f32) -> ControlInput {
        self.input.clamped()
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight::WaypointSpec;

    fn hovering_at(y: f32) -> FlightState {
        FlightState { position: Vec3f::new(0.0, y, 0.0), altitude: y, ..Default::default() }
    }

    #[test]
    fn climbs_before_moving_off() {
        let mut nav = WaypointNavigator::default();
        nav.set_waypoints([WaypointSpec::new(Vec3f::new(0.0, 50.0, 100.0), WaypointKind::Destination)]);
        nav.start_navigation();
        let mut ap = Autopilot::new(PilotConfig::default());

        let low = ap.control(&hovering_at(0.0), &nav, 1.0 / 60.0);
        assert_eq!(low.throttle, 1.0);
        assert_eq!(low.pitch, 0.0, "no forward stick while far below cruise");

        let level = ap.control(&hovering_at(48.0), &nav, 1.0 / 60.0);
        assert!(level.pitch > 0.9, "cruise stick expected, got {level:?}");
    }

    #[test]
    fn idle_autopilot_holds_altitude_and_brakes() {
        let nav = WaypointNavigator::default();
        let mut ap = Autopilot::new(PilotConfig::default());
        let state = FlightState { velocity: Vec3f::new(2.0, 0.0, 0.0), ..hovering_at(30.0) };
        let input = ap.control(&state, &nav, 1.0 / 60.0);
        assert_eq!(input.throttle, 0.0);
        assert!(input.roll < 0.0, "moving right at heading 0 should roll left, got {input:?}");
        assert_eq!(input.pitch, 0.0);
    }

    #[test]
    fn return_leg_flies_the_waypoint_height() {
        let mut nav = WaypointNavigator::default();
        nav.generate_return_path(Vec3f::new(100.0, 12.0, 0.0), Vec3f::ZERO);
        nav.start_navigation();
        nav.update(Vec3f::new(100.0, 12.0, 0.0));
        assert_eq!(nav.get_target_altitude(), 50.0);

        let mut ap = Autopilot::new(PilotConfig::default());
        let at_transit_height =
            FlightState { position: Vec3f::new(100.0, 30.0, 0.0), altitude: 30.0, ..Default::default() };
        let input = ap.control(&at_transit_height, &nav, 1.0 / 60.0);
        assert_eq!(input.throttle, 0.0, "transit sits at y = 30, not the 50 m cruise default");
    }

    #[test]
    fn manual_input_is_clamped_to_stick_range() {
        let wild = ControlInput { throttle: 3.0, yaw: -2.0, pitch: 0.5, roll: -1.5 };
        let mut pilot = pilot_for(&PilotConfig { mode: PilotMode::Manual, manual_input: wild, ..Default::default() });
        let out = pilot.control(&hovering_at(10.0), &WaypointNavigator::default(), 0.1);
        assert_eq!(out, ControlInput { throttle: 1.0, yaw: -1.0, pitch: 0.5, roll: -1.0 });
    }

    #[test]
    fn manual_replays_its_input() {
        let stick = ControlInput { throttle: 0.2, yaw: -0.3, pitch: 0.4, roll: 0.0 };
        let mut pilot = pilot_for(&PilotConfig { mode: PilotMode::Manual, manual_input: stick, ..Default::default() });
        assert_eq!(pilot.name(), "manual");
        assert_eq!(pilot.control(&hovering_at(10.0), &WaypointNavigator::default(), 0.1), stick);
    }
}
