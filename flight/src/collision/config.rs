use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Vec2f;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub drone_radius: f32,
    /// Proximity warnings fire when the nearest box is closer than this.
    pub warning_distance: f32,
    /// Below this altitude collision checks are skipped (take-off and landing).
    pub min_altitude: f32,
    /// Ground-plane (x, z) centre of the no-check disk around the pad.
    pub exclusion_center: Vec2f,
    pub exclusion_radius: f32,
    /// Minimum gap between two reported collisions.
    pub cooldown_ms: u64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            drone_radius: 1.5,
            warning_distance: 10.0,
            min_altitude: 15.0,
            exclusion_center: Vec2f::ZERO,
            exclusion_radius: 20.0,
            cooldown_ms: 1000,
        }
    }
}

impl CollisionConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
