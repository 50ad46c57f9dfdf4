use std::time::Duration;

use bevy_app::AppExit;
use bevy_ecs::prelude::*;
use flight::{
    CollisionEvent, CollisionHit, CollisionResult, CollisionSystem, ControlInput, FlightPhysics,
    NavigationPhase, NavigationState, Vec3f, WaypointNavigator,
};
use tracing::{debug, info, warn};

use crate::autopilot::Controller;
use crate::config::Config;
use crate::mission::{landing_accuracy, MissionManager, TaskResult};
use crate::tasks::delivery_route;
use crate::traffic::Traffic;

// A drone counts as landed on an elevated pad within this height and below this speed.
const PAD_HEIGHT_TOLERANCE: f32 = 1.0;
const SETTLED_SPEED: f32 = 0.5;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Clock,
    Traffic,
    Control,
    Physics,
    Navigation,
    Collision,
    Mission,
    Telemetry,
    Exit,
}

/// Fixed-step simulation clock. The collision cooldown reads `elapsed`.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimClock {
    pub dt: f32,
    pub tick: u64,
    pub elapsed: Duration,
}

impl SimClock {
    pub fn new(tick_hz: f32) -> Self {
        Self { dt: 1.0 / tick_hz, tick: 0, elapsed: Duration::ZERO }
    }
}

#[derive(Resource, Debug, Default)]
pub struct Drone(pub FlightPhysics);

#[derive(Resource, Debug, Default)]
pub struct Navigator(pub WaypointNavigator);

#[derive(Resource, Debug, Default)]
pub struct Collisions(pub CollisionSystem);

#[derive(Resource)]
pub struct Pilot(pub Box<dyn Controller>);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LastControl(pub ControlInput);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LastNavigation(pub NavigationState);

#[derive(Resource, Debug, Default, Clone)]
pub struct LastCollision(pub CollisionResult);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlightLeg {
    #[default]
    Delivery,
    ReturningHome,
    Done,
}

/// Where the run stands and how the delivery scored.
#[derive(Resource, Debug, Default, Clone)]
pub struct SimOutcome {
    pub leg: FlightLeg,
    pub result: Option<TaskResult>,
    pub collisions_reported: u32,
    pub warnings_reported: u32,
    pub finished_tick: Option<u64>,
}

#[derive(Event, Debug, Clone)]
pub struct CollisionAlert {
    pub hit: CollisionHit,
    pub at: Duration,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ProximityAlert {
    pub distance: f32,
}

#[derive(Event, Debug, Clone)]
pub struct MissionFinished(pub TaskResult);

pub fn launch_mission(
    cfg: Res<Config>,
    mut drone: ResMut<Drone>,
    mut nav: ResMut<Navigator>,
    mut collisions: ResMut<Collisions>,
    traffic: Res<Traffic>,
    mut mission: ResMut<MissionManager>,
) {
    let task = &cfg.task;
    let scene = task.scene.build();
    collisions.0.collect_buildings_from_scene(&scene);
    collisions.0.register_vehicles(traffic.tracked_vehicles());

    drone.0.reset();
    drone.0.set_position(task.start);
    drone.0.start_engine();

    nav.0.set_waypoints(delivery_route(task));
    if !nav.0.start_navigation() {
        warn!(task = %task.id, "route is empty; drone will hover");
    }
    mission.start_task(task.clone());

    info!(
        task = %task.id,
        scene = ?task.scene,
        waypoints = nav.0.waypoints().len(),
        route_m = nav.0.total_distance(),
        obstacles = collisions.0.obstacle_count(),
        "mission launched"
    );
}

pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.tick += 1;
    clock.elapsed = Duration::from_secs_f64(clock.tick as f64 * clock.dt as f64);
}

pub fn drive_traffic(clock: Res<SimClock>, mut traffic: ResMut<Traffic>, mut collisions: ResMut<Collisions>) {
    traffic.update(clock.dt);
    for (id, transform) in traffic.transforms() {
        collisions.0.set_vehicle_transform(&id, transform);
    }
}

pub fn pilot_drone(
    clock: Res<SimClock>,
    drone: Res<Drone>,
    nav: Res<Navigator>,
    mut pilot: ResMut<Pilot>,
    mut control: ResMut<LastControl>,
) {
    control.0 = pilot.0.control(drone.0.state(), &nav.0, clock.dt);
}

pub fn step_flight(clock: Res<SimClock>, control: Res<LastControl>, mut drone: ResMut<Drone>) {
    drone.0.update(clock.dt, control.0);
}

pub fn track_navigation(drone: Res<Drone>, mut nav: ResMut<Navigator>, mut last: ResMut<LastNavigation>) {
    let previous = last.0.phase;
    last.0 = nav.0.update(drone.0.state().position);
    if previous != last.0.phase {
        debug!(from = ?previous, to = ?last.0.phase, "navigation phase changed");
    }
}

pub fn detect_collisions(
    clock: Res<SimClock>,
    drone: Res<Drone>,
    mut collisions: ResMut<Collisions>,
    mut last: ResMut<LastCollision>,
    mut alerts: EventWriter<CollisionAlert>,
    mut warnings: EventWriter<ProximityAlert>,
    mut outcome: ResMut<SimOutcome>,
) {
    last.0 = collisions.0.update(drone.0.state().position, clock.elapsed);
    for event in collisions.0.drain_events() {
        match event {
            CollisionEvent::Collision(hit) => {
                warn!(object = %hit.object, kind = ?hit.kind, at = ?hit.point, "collision");
                outcome.collisions_reported += 1;
                alerts.write(CollisionAlert { hit, at: clock.elapsed });
            }
            CollisionEvent::ProximityWarning { distance } => {
                debug!(distance, "obstacle proximity");
                outcome.warnings_reported += 1;
                warnings.write(ProximityAlert { distance });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn score_mission(
    cfg: Res<Config>,
    clock: Res<SimClock>,
    drone: Res<Drone>,
    mut nav: ResMut<Navigator>,
    mut pilot: ResMut<Pilot>,
    mut mission: ResMut<MissionManager>,
    mut outcome: ResMut<SimOutcome>,
    mut alerts: EventReader<CollisionAlert>,
    mut finished: EventWriter<MissionFinished>,
) {
    let state = *drone.0.state();
    let collided = alerts.read().count();

    let route_done = nav.0.phase() == NavigationPhase::Completed;
    let landed_on = |target: Vec3f| {
        route_done
            && (state.is_grounded
                || ((state.position.y - target.y).abs() < PAD_HEIGHT_TOLERANCE && state.speed < SETTLED_SPEED))
    };

    let leg = outcome.leg;
    match leg {
        FlightLeg::Delivery => {
            for _ in 0..collided {
                if let Err(e) = mission.record_collision() {
                    warn!(error = %e, "collision outside a task");
                }
            }
            let timed_out = match mission.update_progress(state.position, state.velocity, clock.elapsed) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "no task to track");
                    None
                }
            };
            let result = match timed_out {
                Some(r) => Some(r),
                None if landed_on(cfg.task.destination) => {
                    let accuracy = landing_accuracy(state.position, cfg.task.destination, cfg.landing_tolerance);
                    mission.complete_task(accuracy).ok()
                }
                None => None,
            };
            let Some(result) = result else { return };

            let go_home = result.success && cfg.return_home;
            outcome.result = Some(result.clone());
            finished.write(MissionFinished(result));
            if go_home {
                nav.0.generate_return_path(state.position, cfg.home);
                nav.0.start_navigation();
                pilot.0.reset();
                outcome.leg = FlightLeg::ReturningHome;
                info!(home = ?cfg.home, "returning home");
            } else {
                outcome.leg = FlightLeg::Done;
                outcome.finished_tick = Some(clock.tick);
            }
        }
        FlightLeg::ReturningHome => {
            if landed_on(cfg.home) {
                info!(tick = clock.tick, "landed at home");
                outcome.leg = FlightLeg::Done;
                outcome.finished_tick = Some(clock.tick);
            }
        }
        FlightLeg::Done => {}
    }
}

pub fn log_telemetry(
    cfg: Res<Config>,
    clock: Res<SimClock>,
    drone: Res<Drone>,
    nav: Res<LastNavigation>,
    control: Res<LastControl>,
) {
    if cfg.telemetry_every == 0 || clock.tick % cfg.telemetry_every != 0 {
        return;
    }
    let s = drone.0.state();
    info!(
        tick = clock.tick,
        t = clock.elapsed.as_secs_f32(),
        x = s.position.x,
        y = s.position.y,
        z = s.position.z,
        speed = s.speed,
        heading = s.heading,
        waypoint = nav.0.current_waypoint_index,
        progress = nav.0.progress,
        eta = nav.0.eta,
        throttle = control.0.throttle,
        "telemetry"
    );
}

pub fn exit_when_finished(
    cfg: Res<Config>,
    clock: Res<SimClock>,
    mut mission: ResMut<MissionManager>,
    mut outcome: ResMut<SimOutcome>,
    mut exit: EventWriter<AppExit>,
    mut reported: Local<bool>,
) {
    if outcome.leg != FlightLeg::Done && clock.tick >= cfg.max_ticks {
        warn!(ticks = clock.tick, "tick budget exhausted");
        if outcome.result.is_none() {
            outcome.result = mission.fail_task("tick budget exhausted").ok();
        }
        outcome.leg = FlightLeg::Done;
        outcome.finished_tick = Some(clock.tick);
    }
    if outcome.leg != FlightLeg::Done {
        return;
    }
    if !*reported {
        *reported = true;
        match &outcome.result {
            Some(r) => info!(
                task = %r.task_id,
                success = r.success,
                score = r.total_score,
                stars = r.stars,
                collisions = r.collisions,
                km = r.flight_distance_km,
                ticks = clock.tick,
                "run finished"
            ),
            None => info!(ticks = clock.tick, "run finished without a result"),
        }
    }
    exit.write(AppExit::Success);
}
