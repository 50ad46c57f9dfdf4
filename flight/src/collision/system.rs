use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::CollisionConfig;
use super::scene::{ObstacleFilter, SceneObject, SceneObjectKind, MODEL_FILTER, SCENE_FILTER};
use crate::{Aabb, Vec2f, Vec3f};

// Scene nodes that are never obstacles even when they have big geometry.
const NON_OBSTACLE_NAMES: [&str; 4] = ["drone", "ground", "sky", "landingPad"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A static box and the scene node it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub source: ObjectId,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleTransform {
    /// Ground contact point (centre of the footprint at road level).
    pub position: Vec3f,
    /// Same convention as the drone: 0 faces +Z.
    pub heading: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedVehicle {
    pub id: ObjectId,
    /// Body half size: x = half width, y = half height, z = half length.
    pub half_extents: Vec3f,
    pub transform: VehicleTransform,
    /// World box; refreshed by [`CollisionSystem::update_vehicle_bounds`].
    pub bounds: Aabb,
}

impl TrackedVehicle {
    pub fn new(id: impl Into<ObjectId>, half_extents: Vec3f, transform: VehicleTransform) -> Self {
        let mut v = Self { id: id.into(), half_extents, transform, bounds: Aabb::new(Vec3f::ZERO, Vec3f::ZERO) };
        v.refresh_bounds();
        v
    }

    /// Fit an axis-aligned box around the heading-rotated body.
    pub fn refresh_bounds(&mut self) {
        let h = self.half_extents.abs();
        let (s, c) = self.transform.heading.sin_cos();
        let (s, c) = (s.abs(), c.abs());
        let ext = Vec3f::new(c * h.x + s * h.z, h.y, s * h.x + c * h.z);
        let center = self.transform.position + Vec3f::new(0.0, h.y, 0.0);
        self.bounds = Aabb::from_center_half_extents(center, ext);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Building,
    Vehicle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionHit {
    pub object: ObjectId,
    pub kind: ObstacleKind,
    /// Drone position at the time of the hit.
    pub point: Vec3f,
    /// Drone centre to box surface; zero when the centre is inside.
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub hit: Option<CollisionHit>,
}

impl CollisionResult {
    pub fn none() -> Self {
        Self { hit: None }
    }

    pub fn has_collision(&self) -> bool {
        self.hit.is_some()
    }
}

/// Outbound notifications queued by [`CollisionSystem::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    /// Debounced by the configured cooldown.
    Collision(CollisionHit),
    /// Emitted every tick the drone is clear but close to something.
    ProximityWarning { distance: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    config: CollisionConfig,
    obstacles: Vec<Obstacle>,
    vehicles: Vec<TrackedVehicle>,
    last_collision_at: Option<Duration>,
    events: Vec<CollisionEvent>,
}

impl CollisionSystem {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Replace the static obstacles with the building-sized meshes of `scene`.
    /// Returns how many were kept.
    pub fn collect_buildings_from_scene(&mut self, scene: &SceneObject) -> usize {
        self.obstacles = harvest(scene, SCENE_FILTER, &NON_OBSTACLE_NAMES);
        debug!(count = self.obstacles.len(), root = %scene.name, "collected scene obstacles");
        self.obstacles.len()
    }

    /// Replace the static obstacles with the large meshes of an imported model.
    pub fn collect_from_model(&mut self, model: &SceneObject) -> usize {
        self.obstacles = harvest(model, MODEL_FILTER, &[]);
        debug!(count = self.obstacles.len(), root = %model.name, "collected model obstacles");
        self.obstacles.len()
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    pub fn register_vehicles(&mut self, vehicles: impl IntoIterator<Item = TrackedVehicle>) {
        self.vehicles = vehicles.into_iter().collect();
        self.update_vehicle_bounds();
    }

    /// Move a tracked vehicle. Its box follows on the next `update` (or
    /// `update_vehicle_bounds`). Returns false for an unknown id.
    pub fn set_vehicle_transform(&mut self, id: &ObjectId, transform: VehicleTransform) -> bool {
        match self.vehicles.iter_mut().find(|v| &v.id == id) {
            Some(v) => {
                v.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn update_vehicle_bounds(&mut self) {
        for v in &mut self.vehicles {
            v.refresh_bounds();
        }
    }

    /// Sphere test against buildings, then vehicles; first hit wins.
    pub fn check_collision(&self, position: Vec3f) -> CollisionResult {
        if position.y < self.config.min_altitude {
            return CollisionResult::none();
        }
        let ground = Vec2f::new(position.x, position.z);
        if ground.distance(self.config.exclusion_center) < self.config.exclusion_radius {
            return CollisionResult::none();
        }

        let r = self.config.drone_radius;
        let building = self
            .obstacles
            .iter()
            .find(|o| o.bounds.intersects_sphere(position, r))
            .map(|o| (&o.source, &o.bounds, ObstacleKind::Building));
        let hit = building.or_else(|| {
            self.vehicles
                .iter()
                .find(|v| v.bounds.intersects_sphere(position, r))
                .map(|v| (&v.id, &v.bounds, ObstacleKind::Vehicle))
        });

        CollisionResult {
            hit: hit.map(|(id, bounds, kind)| CollisionHit {
                object: id.clone(),
                kind,
                point: position,
                distance: bounds.distance_to_point(position),
            }),
        }
    }

    /// Distance to the closest box of either population; infinite when empty.
    /// Ignores the altitude and exclusion gates.
    pub fn nearest_obstacle_distance(&self, position: Vec3f) -> f32 {
        self.obstacles
            .iter()
            .map(|o| &o.bounds)
            .chain(self.vehicles.iter().map(|v| &v.bounds))
            .map(|b| b.distance_to_point(position))
            .fold(f32::INFINITY, f32::min)
    }

    /// Per-tick entry point. `now` is any monotonic clock; only differences matter.
    pub fn update(&mut self, position: Vec3f, now: Duration) -> CollisionResult {
        self.update_vehicle_bounds();
        let result = self.check_collision(position);

        match &result.hit {
            Some(hit) => {
                let cooled_down = self
                    .last_collision_at
                    .map_or(true, |last| now.saturating_sub(last) > self.config.cooldown());
                if cooled_down {
                    self.last_collision_at = Some(now);
                    debug!(object = %hit.object, kind = ?hit.kind, "collision");
                    self.events.push(CollisionEvent::Collision(hit.clone()));
                }
            }
            None => {
                let distance = self.nearest_obstacle_distance(position);
                if distance < self.config.warning_distance {
                    self.events.push(CollisionEvent::ProximityWarning { distance });
                }
            }
        }
        result
    }

    /// Take every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buildings plus vehicles.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len() + self.vehicles.len()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn vehicles(&self) -> &[TrackedVehicle] {
        &self.vehicles
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.vehicles.clear();
    }
}

fn harvest(root: &SceneObject, filter: ObstacleFilter, skip: &[&str]) -> Vec<Obstacle> {
    let mut out = Vec::new();
    // Skipping a node does not prune its subtree.
    root.walk(Vec3f::ZERO, &mut |node, parent_origin| {
        if skip.contains(&node.name.as_str()) || node.kind != SceneObjectKind::Mesh {
            return;
        }
        if let Some(bounds) = node.world_bounds(parent_origin) {
            if filter.accepts(&bounds) {
                out.push(Obstacle { source: ObjectId(node.name.clone()), bounds });
            }
        }
    });
    out
}
