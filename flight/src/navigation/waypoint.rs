use serde::{Deserialize, Serialize};

use crate::Vec3f;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Start,
    #[default]
    Waypoint,
    Destination,
}

/// Waypoint as supplied by a caller; missing fields are filled on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub position: Vec3f,
    #[serde(default)]
    pub kind: WaypointKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub altitude: Option<f32>,
    #[serde(default)]
    pub speed: Option<f32>,
}

impl WaypointSpec {
    pub fn new(position: Vec3f, kind: WaypointKind) -> Self {
        Self { id: None, position, kind, name: None, altitude: None, speed: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_altitude(mut self, altitude: f32) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// A stored path entry. Altitude and speed are always resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub position: Vec3f,
    pub kind: WaypointKind,
    pub name: Option<String>,
    /// Cruise altitude suggested while this waypoint is the target.
    pub altitude: f32,
    /// Expected ground speed on the leg toward this waypoint, m/s.
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub default_altitude: f32,
    pub default_speed: f32,
    /// A waypoint counts as reached strictly inside this 3D distance.
    pub arrival_radius: f32,
    /// Horizontal distance at which steering asks for full forward pitch.
    pub approach_distance: f32,
    /// Heading error beyond which steering turns in place without pitching.
    pub heading_window: f32,
    /// Floor for the transit leg of a generated return path.
    pub min_return_altitude: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            default_altitude: 50.0,
            default_speed: 10.0,
            arrival_radius: 5.0,
            approach_distance: 20.0,
            heading_window: std::f32::consts::FRAC_PI_4,
            min_return_altitude: 30.0,
        }
    }
}

impl NavigatorConfig {
    pub(super) fn resolve(&self, spec: WaypointSpec, fallback_id: impl FnOnce() -> String) -> Waypoint {
        Waypoint {
            id: spec.id.unwrap_or_else(fallback_id),
            position: spec.position,
            kind: spec.kind,
            name: spec.name,
            altitude: spec.altitude.unwrap_or(self.default_altitude),
            speed: spec.speed.unwrap_or(self.default_speed),
        }
    }
}
