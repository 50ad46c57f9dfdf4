//! Static obstacle and traffic collision detection for the drone.
//!
//! Obstacles are axis-aligned boxes harvested from a scene tree; vehicles are
//! boxes recomputed from live transforms. The drone is a sphere. Detection
//! only reports; nothing here pushes the drone out of geometry.

mod config;
mod scene;
mod system;

pub use config::CollisionConfig;
pub use scene::{ObstacleFilter, SceneObject, SceneObjectKind, MODEL_FILTER, SCENE_FILTER};
pub use system::{
    CollisionEvent, CollisionHit, CollisionResult, CollisionSystem, ObjectId, Obstacle,
    ObstacleKind, TrackedVehicle, VehicleTransform,
};
