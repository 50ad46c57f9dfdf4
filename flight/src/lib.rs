//! Flight core for the drone delivery simulator.
//!
//! This crate intentionally avoids any ECS types. It holds the per-tick
//! flight integrator, the waypoint navigator and the collision detector as
//! plain owned structs, so a host loop (see the `sim` crate) can drive them
//! in whatever order it likes.

mod math;
pub use math::{horizontal_distance, lerp, wrap_angle, Aabb, Vec2f, Vec3f};

pub mod builtins;

pub mod flight_physics;
pub use flight_physics::{
    drag_force, gravity_force, thrust_force, ControlInput, FlightPhysics, FlightState,
    FlightStepDebug,
};

mod flight_specs;
pub use flight_specs::presets;
pub use flight_specs::FlightPhysicsConfig;

pub mod navigation;
pub use navigation::{
    NavigationInput, NavigationPhase, NavigationState, NavigatorConfig, Waypoint, WaypointKind,
    WaypointNavigator, WaypointSpec,
};

pub mod collision;
pub use collision::{
    CollisionConfig, CollisionEvent, CollisionHit, CollisionResult, CollisionSystem, ObjectId,
    Obstacle, ObstacleKind, SceneObject, SceneObjectKind, TrackedVehicle, VehicleTransform,
};
