use serde::{Deserialize, Serialize};

/// Physics parameters for a drone airframe.
///
/// Deserializes with `#[serde(default)]`, so a partial TOML table only
/// overrides the fields it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPhysicsConfig {
    /// kg
    pub mass: f32,
    /// N, scales both the vertical and the horizontal thrust terms
    pub max_thrust: f32,
    pub drag_coefficient: f32,
    /// Carried for airframe descriptions; the force model does not use it.
    pub lift_coefficient: f32,
    /// Horizontal speed cap, m/s
    pub max_speed: f32,
    pub max_altitude: f32,
    /// rad/s at full yaw input
    pub rotation_speed: f32,
    /// Visual tilt at full pitch/roll input, rad
    pub tilt_angle: f32,
    pub gravity: f32,
    /// Horizontal distance from the origin the drone may not leave.
    pub boundary_radius: f32,
}

impl Default for FlightPhysicsConfig {
    fn default() -> Self {
        Self {
            mass: 5.0,
            max_thrust: 100.0,
            drag_coefficient: 0.3,
            lift_coefficient: 0.5,
            max_speed: 20.0,
            max_altitude: 500.0,
            rotation_speed: 2.0,
            tilt_angle: 0.5,
            gravity: 9.8,
            boundary_radius: 1000.0,
        }
    }
}

impl FlightPhysicsConfig {
    /// Vertical thrust that exactly cancels gravity.
    pub fn hover_thrust(&self) -> f32 {
        self.gravity * self.mass
    }
}

pub mod presets {
    use super::*;

    /// The stock trainer quad used by every built-in mission.
    pub fn training_quad() -> FlightPhysicsConfig {
        FlightPhysicsConfig::default()
    }

    // Heavier lifter: more thrust for the extra mass, slower to turn, lower cap.
    pub fn cargo_quad() -> FlightPhysicsConfig {
        FlightPhysicsConfig {
            mass: 9.0,
            max_thrust: 180.0,
            drag_coefficient: 0.45,
            max_speed: 14.0,
            rotation_speed: 1.2,
            tilt_angle: 0.35,
            ..FlightPhysicsConfig::default()
        }
    }
}
