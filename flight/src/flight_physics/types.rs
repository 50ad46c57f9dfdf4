use serde::{Deserialize, Serialize};

use crate::Vec3f;

/// Pilot (or autopilot) stick input for one tick.
///
/// Every axis is conceptually in [-1, 1]. The integrator does not clamp, so
/// out-of-range values simply scale the forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlInput {
    /// +1 climbs, -1 descends, 0 holds altitude.
    pub throttle: f32,
    /// +1 turns toward increasing heading.
    pub yaw: f32,
    /// +1 accelerates along the heading.
    pub pitch: f32,
    /// +1 strafes to the right of the heading.
    pub roll: f32,
}

impl ControlInput {
    pub const NEUTRAL: Self = Self { throttle: 0.0, yaw: 0.0, pitch: 0.0, roll: 0.0 };

    pub fn clamped(self) -> Self {
        Self {
            throttle: self.throttle.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
            pitch: self.pitch.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: Vec3f,
    pub velocity: Vec3f,
    /// Net force over mass from the last engine-on tick.
    pub acceleration: Vec3f,
    /// Euler angles in radians: x = pitch, y = yaw (heading), z = roll.
    /// Pitch and roll are visual tilt only and never feed back into forces.
    pub rotation: Vec3f,
    // Derived; recomputed by `refresh_derived` at the end of every mutation.
    pub altitude: f32,
    pub speed: f32,
    pub heading: f32,
    pub is_grounded: bool,
}

/// Height at or below which the drone counts as resting on the ground.
pub(crate) const GROUNDED_HEIGHT: f32 = 0.1;

impl FlightState {
    pub(super) fn refresh_derived(&mut self) {
        self.altitude = self.position.y;
        self.speed = self.velocity.length();
        self.heading = self.rotation.y;
        self.is_grounded = self.position.y <= GROUNDED_HEIGHT;
    }

    pub fn horizontal_speed(&self) -> f32 {
        super::util::horizontal_len(self.velocity)
    }
}

/// Per-tick telemetry filled by `FlightPhysics::update_dbg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightStepDebug {
    pub dt: f32,
    pub input: ControlInput,
    pub engine_running: bool,
    pub heading: f32,
    // Forces (world, N)
    pub thrust: Vec3f,
    pub drag: Vec3f,
    pub gravity: Vec3f,
    pub net_force: Vec3f,
    pub acceleration: Vec3f,
    // Limits that engaged this tick
    pub speed_clamped: bool,
    pub hit_ground: bool,
    pub hit_ceiling: bool,
    pub hit_boundary: bool,
}
