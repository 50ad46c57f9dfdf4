//! Headless host for the drone delivery simulation.
//!
//! Wires the `flight` core into a bevy app: one `Update` pass is one
//! fixed-size tick, with systems chained in [`SimSet`] order.

pub mod autopilot;
pub mod config;
pub mod mission;
pub mod systems;
pub mod tasks;
pub mod traffic;

use bevy_app::{App, Startup, Update};
use bevy_ecs::prelude::*;
use flight::{CollisionSystem, FlightPhysics, WaypointNavigator};

pub use autopilot::{Autopilot, Controller, ManualPilot, PilotConfig, PilotMode};
pub use config::{load_config, Args, Config};
pub use mission::{DeliveryTask, MissionError, MissionManager, SceneChoice, TaskResult, TaskStatus};
pub use systems::{
    CollisionAlert, Collisions, Drone, FlightLeg, LastCollision, LastControl, LastNavigation,
    MissionFinished, Navigator, Pilot, ProximityAlert, SimClock, SimOutcome, SimSet,
};
pub use traffic::{Traffic, TrafficConfig};

pub fn build_sim_app(cfg: Config) -> App {
    let mut app = App::new();

    app.insert_resource(SimClock::new(cfg.tick_hz))
        .insert_resource(Drone(FlightPhysics::new(cfg.physics.clone())))
        .insert_resource(Navigator(WaypointNavigator::new(cfg.navigation.clone())))
        .insert_resource(Collisions(CollisionSystem::new(cfg.collision.clone())))
        .insert_resource(Traffic::new(&cfg.traffic))
        .insert_resource(Pilot(autopilot::pilot_for(&cfg.pilot)))
        .init_resource::<MissionManager>()
        .init_resource::<LastControl>()
        .init_resource::<LastNavigation>()
        .init_resource::<LastCollision>()
        .init_resource::<SimOutcome>()
        .add_event::<CollisionAlert>()
        .add_event::<ProximityAlert>()
        .add_event::<MissionFinished>();

    app.configure_sets(
        Update,
        (
            SimSet::Clock,
            SimSet::Traffic,
            SimSet::Control,
            SimSet::Physics,
            SimSet::Navigation,
            SimSet::Collision,
            SimSet::Mission,
            SimSet::Telemetry,
            SimSet::Exit,
        )
            .chain(),
    );

    app.add_systems(Startup, systems::launch_mission);
    app.add_systems(
        Update,
        (
            systems::advance_clock.in_set(SimSet::Clock),
            systems::drive_traffic.in_set(SimSet::Traffic),
            systems::pilot_drone.in_set(SimSet::Control),
            systems::step_flight.in_set(SimSet::Physics),
            systems::track_navigation.in_set(SimSet::Navigation),
            systems::detect_collisions.in_set(SimSet::Collision),
            systems::score_mission.in_set(SimSet::Mission),
            systems::log_telemetry.in_set(SimSet::Telemetry),
            systems::exit_when_finished.in_set(SimSet::Exit),
        ),
    );

    app.insert_resource(cfg);
    app
}
