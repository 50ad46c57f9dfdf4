use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::waypoint::{NavigatorConfig, Waypoint, WaypointKind, WaypointSpec};
use crate::{horizontal_distance, wrap_angle, ControlInput, Vec3f};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPhase {
    #[default]
    Idle,
    Navigating,
    Paused,
    /// Every waypoint has been reached; the cursor sits past the end.
    Completed,
}

/// Snapshot returned by [`WaypointNavigator::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub phase: NavigationPhase,
    pub is_navigating: bool,
    pub current_waypoint_index: usize,
    pub total_waypoints: usize,
    pub distance_to_next: f32,
    pub distance_total: f32,
    pub distance_remaining: f32,
    /// Seconds, at the speed of the leg being flown.
    pub eta: f32,
    /// Percent; capped at 100, may go negative while far from the path.
    pub progress: f32,
}

/// Steering suggestion toward the current waypoint. Throttle is left to the
/// caller's altitude controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationInput {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl NavigationInput {
    pub fn with_throttle(self, throttle: f32) -> ControlInput {
        ControlInput { throttle, yaw: self.yaw, pitch: self.pitch, roll: self.roll }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaypointNavigator {
    config: NavigatorConfig,
    waypoints: Vec<Waypoint>,
    current_index: usize,
    phase: NavigationPhase,
    total_distance: f32,
    covered_distance: f32,
}

impl WaypointNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Replace the whole path. Missing ids become `wp_<index>`.
    pub fn set_waypoints(&mut self, specs: impl IntoIterator<Item = WaypointSpec>) {
        let cfg = &self.config;
        self.waypoints = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| cfg.resolve(spec, || format!("wp_{i}")))
            .collect();
        self.current_index = 0;
        self.recompute_total();
    }

    pub fn add_waypoint(&mut self, position: Vec3f, kind: WaypointKind) -> &Waypoint {
        self.push(WaypointSpec::new(position, kind))
    }

    /// Append a fully specified waypoint; a missing id gets a fresh unique one.
    pub fn push(&mut self, spec: WaypointSpec) -> &Waypoint {
        let wp = self.config.resolve(spec, || format!("wp_{}", Uuid::new_v4().simple()));
        self.waypoints.push(wp);
        self.recompute_total();
        let last = self.waypoints.len() - 1;
        &self.waypoints[last]
    }

    pub fn remove_waypoint(&mut self, id: &str) -> bool {
        let Some(idx) = self.waypoints.iter().position(|w| w.id == id) else {
            return false;
        };
        self.waypoints.remove(idx);
        if self.current_index >= self.waypoints.len() {
            self.current_index = self.waypoints.len().saturating_sub(1);
        }
        self.recompute_total();
        true
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
        self.total_distance = 0.0;
        self.covered_distance = 0.0;
        self.phase = NavigationPhase::Idle;
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_index)
    }

    pub fn next_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_index + 1)
    }

    /// Sum of the straight legs between consecutive waypoints.
    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    /// Length of the legs completed since navigation started.
    pub fn covered_distance(&self) -> f32 {
        self.covered_distance
    }

    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    pub fn is_navigating(&self) -> bool {
        self.phase == NavigationPhase::Navigating
    }

    pub fn start_navigation(&mut self) -> bool {
        if self.waypoints.is_empty() {
            return false;
        }
        self.phase = NavigationPhase::Navigating;
        self.current_index = 0;
        self.covered_distance = 0.0;
        true
    }

    pub fn stop_navigation(&mut self) {
        self.phase = NavigationPhase::Idle;
    }

    pub fn pause_navigation(&mut self) {
        if self.phase == NavigationPhase::Navigating {
            self.phase = NavigationPhase::Paused;
        }
    }

    /// Continue from the current cursor. Refused once the path is finished or empty.
    pub fn resume_navigation(&mut self) -> bool {
        if self.phase == NavigationPhase::Completed || self.current_waypoint().is_none() {
            return false;
        }
        self.phase = NavigationPhase::Navigating;
        true
    }

    /// Advance the cursor for `position` and report progress.
    pub fn update(&mut self, position: Vec3f) -> NavigationState {
        if self.phase != NavigationPhase::Navigating {
            return self.resting_state();
        }
        let Some(target) = self.current_waypoint() else {
            self.phase = NavigationPhase::Idle;
            return self.resting_state();
        };
        // ETA uses the leg being flown when the tick started.
        let leg_speed = if target.speed > 0.0 { target.speed } else { self.config.default_speed };

        if position.distance(target.position) < self.config.arrival_radius {
            debug!(waypoint = %target.id, index = self.current_index, "waypoint reached");
            if self.current_index > 0 {
                self.covered_distance += self.leg_length(self.current_index);
            }
            self.current_index += 1;
            if self.current_index >= self.waypoints.len() {
                self.phase = NavigationPhase::Completed;
                debug!(covered = self.covered_distance, "route complete");
                return self.resting_state();
            }
        }

        let Some(target) = self.current_waypoint() else {
            return self.resting_state();
        };
        let distance_to_next = position.distance(target.position);
        let remaining = distance_to_next + self.legs_after(self.current_index);
        let progress = if self.total_distance > 0.0 {
            ((1.0 - remaining / self.total_distance) * 100.0).min(100.0)
        } else {
            0.0
        };

        NavigationState {
            phase: self.phase,
            is_navigating: true,
            current_waypoint_index: self.current_index,
            total_waypoints: self.waypoints.len(),
            distance_to_next,
            distance_total: self.total_distance,
            distance_remaining: remaining,
            eta: remaining / leg_speed,
            progress,
        }
    }

    /// Turn-then-fly steering toward the current waypoint.
    ///
    /// Heading 0 faces +Z and grows toward +X. Zero input when not navigating.
    pub fn get_navigation_input(&self, position: Vec3f, heading: f32) -> NavigationInput {
        if !self.is_navigating() {
            return NavigationInput::default();
        }
        let Some(target) = self.current_waypoint() else {
            return NavigationInput::default();
        };
        let dx = target.position.x - position.x;
        let dz = target.position.z - position.z;
        let heading_error = wrap_angle(dx.atan2(dz) - heading);
        let ground_distance = horizontal_distance(position, target.position);

        let pitch = if heading_error.abs() < self.config.heading_window {
            (ground_distance / self.config.approach_distance.max(f32::EPSILON)).min(1.0)
        } else {
            0.0
        };
        NavigationInput { pitch, roll: 0.0, yaw: heading_error.clamp(-1.0, 1.0) }
    }

    /// Cruise altitude of the current waypoint, or the default when there is none.
    pub fn get_target_altitude(&self) -> f32 {
        self.current_waypoint()
            .map(|w| w.altitude)
            .unwrap_or(self.config.default_altitude)
    }

    /// Replace the path with climb, transit over home, then land at home.
    ///
    /// The profile lives only in the positions' y coordinates; every
    /// waypoint keeps the default cruise altitude, so a host that wants to
    /// land must fly the geometry rather than `get_target_altitude()`.
    pub fn generate_return_path(&mut self, current: Vec3f, home: Vec3f) {
        let transit = Vec3f::new(home.x, current.y.max(self.config.min_return_altitude), home.z);
        self.clear_waypoints();
        self.set_waypoints([
            WaypointSpec::new(current, WaypointKind::Start),
            WaypointSpec::new(transit, WaypointKind::Waypoint),
            WaypointSpec::new(home, WaypointKind::Destination),
        ]);
    }

    fn resting_state(&self) -> NavigationState {
        let completed = self.phase == NavigationPhase::Completed;
        NavigationState {
            phase: self.phase,
            is_navigating: false,
            current_waypoint_index: self.current_index,
            total_waypoints: self.waypoints.len(),
            progress: if completed { 100.0 } else { 0.0 },
            ..Default::default()
        }
    }

    // Length of the leg ending at `index`.
    fn leg_length(&self, index: usize) -> f32 {
        match (self.waypoints.get(index.wrapping_sub(1)), self.waypoints.get(index)) {
            (Some(a), Some(b)) => a.position.distance(b.position),
            _ => 0.0,
        }
    }

    // Sum of the legs that start at or after `index`.
    fn legs_after(&self, index: usize) -> f32 {
        self.waypoints
            .get(index..)
            .map(|rest| rest.windows(2).map(|w| w[0].position.distance(w[1].position)).sum::<f32>())
            .unwrap_or(0.0)
    }

    fn recompute_total(&mut self) {
        self.total_distance = self.legs_after(0);
    }
}
